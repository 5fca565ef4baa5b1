#[cfg(test)]
mod tests {
    use crate::access::JoinPolicy;
    use crate::config::{Config, ServiceConfig};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.service, ServiceConfig::default());
        assert_eq!(config.service.join_policy, JoinPolicy::OrganizerOnly);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("POKER_JOIN_POLICY", "everyone"),
            ("POKER_COMMIT_RETRIES", "3"),
            ("POKER_VIEWER_BUFFER", "16"),
            ("POKER_SKIP_ACTOR_ECHO", "true"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.service.join_policy, JoinPolicy::Everyone);
        assert_eq!(config.service.commit_retries, 3);
        assert_eq!(config.service.viewer_buffer, 16);
        assert!(config.service.skip_actor_echo);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("POKER_JOIN_POLICY", "nobody")])).is_err());
        assert!(Config::from_lookup(lookup(&[("POKER_SKIP_ACTOR_ECHO", "maybe")])).is_err());
    }
}
