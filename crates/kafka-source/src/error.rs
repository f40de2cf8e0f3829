use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Consumer error: {0}")]
    Consume(String),
}

pub type Result<T> = std::result::Result<T, Error>;
