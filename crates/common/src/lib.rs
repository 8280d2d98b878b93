pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_as_status_object() {
        let body = serde_json::to_value(types::Health::ok()).unwrap_or_default();
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }
}
