use jsexpr::repl::{self, Mode};

fn main() {
    init_tracing();

    let mode = Mode::from_env();
    println!("Hello! This is the jsexpr expression language!");
    match mode {
        Mode::Evaluate => println!("Feel free to type in expressions"),
        Mode::Compile => println!("Feel free to type in expressions to compile to JavaScript"),
    }
    repl::start(mode)
}

/// Installs a stderr subscriber when `RUST_LOG` is set; logging stays off
/// otherwise.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
