#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Convert(#[from] avro_text::Error),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),
}
