use super::{ConnectOptions, Engine};

pub fn parse_engine(s: &str) -> Option<Engine> {
    match s.to_lowercase().as_str() {
        "nats" => Some(Engine::Nats),
        "amqp" => Some(Engine::Amqp),
        "redis" => Some(Engine::Redis),
        #[cfg(any(test, feature = "queue-mock"))]
        "mock" => Some(Engine::Mock),
        _ => None,
    }
}

pub fn parse_connect_kv(pairs: &[String]) -> ConnectOptions {
    let mut opts = ConnectOptions::default();
    for p in pairs {
        if let Some((k, v)) = p.split_once('=') {
            opts.params.insert(k.to_string(), v.to_string());
        }
    }
    opts
}

/// Bounded reconnect budget for the session itself. The publisher never
/// retries a failed send.
pub fn max_reconnects(opts: &ConnectOptions) -> usize {
    opts.params
        .get("max_reconnects")
        .and_then(|s| s.parse().ok())
        .unwrap_or(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_engines() {
        assert_eq!(parse_engine("NATS"), Some(Engine::Nats));
        assert_eq!(parse_engine("amqp"), Some(Engine::Amqp));
        assert_eq!(parse_engine("redis"), Some(Engine::Redis));
        assert_eq!(parse_engine("mock"), Some(Engine::Mock));
        assert_eq!(parse_engine("sqs"), None);
    }

    #[test]
    fn parses_connect_pairs_and_retry_budget() {
        let opts = parse_connect_kv(&[
            "url=nats://localhost:4222".to_string(),
            "max_reconnects=3".to_string(),
            "garbage".to_string(),
        ]);
        assert_eq!(opts.params.get("url").unwrap(), "nats://localhost:4222");
        assert_eq!(max_reconnects(&opts), 3);
        assert_eq!(opts.params.len(), 2);

        assert_eq!(max_reconnects(&ConnectOptions::default()), 5);
    }
}
