fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and
    /// compares the JSON values. The fixtures are captured from server
    /// responses, so a mismatch means a DTO drifted from the wire format.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  server: {fixture}\n  client: {reserialized}"
        );
    }

    #[test]
    fn fixture_start_transfer_request() {
        roundtrip_test::<droplink_protocol::messages::StartTransferRequest>(
            "start_transfer_request.json",
        );
    }

    #[test]
    fn fixture_chunk_request() {
        roundtrip_test::<droplink_protocol::messages::ChunkRequest>("chunk_request.json");
    }

    #[test]
    fn fixture_transfer_response() {
        roundtrip_test::<droplink_protocol::messages::TransferResponse>("transfer_response.json");
    }

    #[test]
    fn fixture_shared_link() {
        roundtrip_test::<droplink_protocol::types::SharedLink>("shared_link.json");
    }

    #[test]
    fn fixture_login_response() {
        roundtrip_test::<droplink_protocol::messages::LoginResponse>("login_response.json");
    }

    #[test]
    fn fixture_storage_info() {
        roundtrip_test::<droplink_protocol::types::StorageInfo>("storage_info.json");
    }
}
