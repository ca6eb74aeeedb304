pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn paged_envelope_serializes_camel_case() {
        let p = types::Paged::new(vec![1u32, 2, 3], 3, 0, 20);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["totalElements"], 3);
        assert_eq!(v["data"].as_array().unwrap().len(), 3);
    }
}
