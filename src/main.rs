use ga4gh_jwks::{
    config::KeygenConfig, error::KeygenError, keygen::generate_and_persist_key_pair,
};
use tracing::Level;

fn main() -> Result<(), KeygenError> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let config = KeygenConfig::default();
    generate_and_persist_key_pair(&config.output_dir)
}
