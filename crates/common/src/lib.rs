pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_serializes_without_empty_error() {
        let body = types::MessageBody::new("Service deleted");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Service deleted"}));

        let body = types::MessageBody::with_error("Server error", "connection reset");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "connection reset");
    }
}
