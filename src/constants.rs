/// Prefix for every log line emitted by the service.
pub const API_NAME: &str = "[car-service-api]";
