//! Synthetic event records and their generators.
//!
//! Every record is produced fresh per unit of work, populated with random
//! identifiers and a timestamp one day in the past, then serialized and
//! published. Nothing is retained between units.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 52-letter mixed-case alphabet used for all identifier strings.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const ONE_DAY_SECS: i64 = 86_400;

/// Placeholder blob carried by the webhook records.
const FAKE_BLOB: &[u8] = b"fake_json_data";

/// Record kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    View,
    CartCreate,
    OrderCreate,
    OrderPaid,
}

/// Draw a random identifier string of `len` characters, each picked
/// independently and uniformly from the 52-letter alphabet.
pub fn rand_string<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// One impression of a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEvent {
    pub org_id: u32,
    pub shop_name: String,
    pub site_visitor_id: String,
    pub cart_token: String,
    pub campaign_id: u32,
    pub product_id: u32,
    pub playbook_id: u32,
    pub created_at: i64,
}

impl ViewEvent {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::generate_at(rng, Utc::now().timestamp())
    }

    /// Generate against an explicit generation instant (unix seconds).
    pub fn generate_at<R: Rng>(rng: &mut R, now: i64) -> Self {
        Self {
            org_id: 0,
            shop_name: rand_string(rng, 10),
            site_visitor_id: rand_string(rng, 8),
            cart_token: rand_string(rng, 12),
            campaign_id: rng.random_range(0..1_000),
            product_id: rng.random_range(0..10_000),
            playbook_id: rng.random_range(0..100),
            created_at: now - ONE_DAY_SECS,
        }
    }
}

/// Shopping-cart creation webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartCreateEvent {
    pub id: i64,
    pub cart_token: String,
    pub shop: String,
    #[serde(with = "blob")]
    pub blob_cached_json: Vec<u8>,
    pub created_at: i64,
}

impl CartCreateEvent {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::generate_at(rng, Utc::now().timestamp())
    }

    pub fn generate_at<R: Rng>(rng: &mut R, now: i64) -> Self {
        Self {
            id: 0,
            cart_token: rand_string(rng, 12),
            shop: rand_string(rng, 10),
            blob_cached_json: FAKE_BLOB.to_vec(),
            created_at: now - ONE_DAY_SECS,
        }
    }
}

/// Order creation webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreateEvent {
    // The downstream consumer parses the order id under this exact key.
    #[serde(rename = "ID")]
    pub id: i64,
    pub cart_token: String,
    pub shop: String,
    pub checkout_id: String,
    pub checkout_token: String,
    #[serde(with = "blob")]
    pub blob_cached_json: Vec<u8>,
    pub created_at: i64,
}

impl OrderCreateEvent {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::generate_at(rng, Utc::now().timestamp())
    }

    pub fn generate_at<R: Rng>(rng: &mut R, now: i64) -> Self {
        Self {
            id: 0,
            cart_token: rand_string(rng, 12),
            shop: rand_string(rng, 10),
            checkout_id: rand_string(rng, 8),
            checkout_token: rand_string(rng, 16),
            blob_cached_json: FAKE_BLOB.to_vec(),
            created_at: now - ONE_DAY_SECS,
        }
    }
}

/// Order payment webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPaidEvent {
    #[serde(rename = "ID")]
    pub id: i64,
    pub cart_token: String,
    pub checkout_id: String,
    pub checkout_token: String,
    pub shop: String,
    #[serde(with = "blob")]
    pub blob_cached_json: Vec<u8>,
    pub created_at: i64,
}

impl OrderPaidEvent {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self::generate_at(rng, Utc::now().timestamp())
    }

    pub fn generate_at<R: Rng>(rng: &mut R, now: i64) -> Self {
        Self {
            id: 0,
            cart_token: rand_string(rng, 12),
            checkout_id: rand_string(rng, 8),
            checkout_token: rand_string(rng, 16),
            shop: rand_string(rng, 10),
            blob_cached_json: FAKE_BLOB.to_vec(),
            created_at: now - ONE_DAY_SECS,
        }
    }
}

/// `blob_cached_json` goes over the wire as its UTF-8 string form, not as a
/// JSON byte array.
mod blob {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        String::from_utf8_lossy(bytes).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        Ok(String::deserialize(de)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn identifier_strings_have_fixed_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let view = ViewEvent::generate(&mut rng);
            assert_eq!(view.shop_name.len(), 10);
            assert_eq!(view.site_visitor_id.len(), 8);
            assert_eq!(view.cart_token.len(), 12);
            for s in [&view.shop_name, &view.site_visitor_id, &view.cart_token] {
                assert!(s.bytes().all(|b| b.is_ascii_alphabetic()), "non-letter in {s}");
            }
        }
        for _ in 0..100 {
            let order = OrderCreateEvent::generate(&mut rng);
            assert_eq!(order.cart_token.len(), 12);
            assert_eq!(order.shop.len(), 10);
            assert_eq!(order.checkout_id.len(), 8);
            assert_eq!(order.checkout_token.len(), 16);
            let paid = OrderPaidEvent::generate(&mut rng);
            assert_eq!(paid.checkout_id.len(), 8);
            assert_eq!(paid.checkout_token.len(), 16);
        }
    }

    #[test]
    fn numeric_ids_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let view = ViewEvent::generate(&mut rng);
            assert!(view.campaign_id < 1_000);
            assert!(view.product_id < 10_000);
            assert!(view.playbook_id < 100);
            assert_eq!(view.org_id, 0);
        }
        assert_eq!(CartCreateEvent::generate(&mut rng).id, 0);
        assert_eq!(OrderCreateEvent::generate(&mut rng).id, 0);
        assert_eq!(OrderPaidEvent::generate(&mut rng).id, 0);
    }

    #[test]
    fn created_at_is_one_day_before_generation() {
        let mut rng = StdRng::seed_from_u64(9);
        for now in [0i64, 86_400, 1_700_000_000, i64::MAX / 2] {
            assert_eq!(ViewEvent::generate_at(&mut rng, now).created_at, now - 86_400);
            assert_eq!(CartCreateEvent::generate_at(&mut rng, now).created_at, now - 86_400);
            assert_eq!(OrderCreateEvent::generate_at(&mut rng, now).created_at, now - 86_400);
            assert_eq!(OrderPaidEvent::generate_at(&mut rng, now).created_at, now - 86_400);
        }
    }

    #[test]
    fn webhooks_carry_the_fixed_blob() {
        let mut rng = StdRng::seed_from_u64(3);
        let cart = CartCreateEvent::generate(&mut rng);
        assert_eq!(cart.blob_cached_json, b"fake_json_data");
    }

    #[test]
    fn same_seed_reproduces_the_same_record() {
        let a = ViewEvent::generate_at(&mut StdRng::seed_from_u64(7), 1_000);
        let b = ViewEvent::generate_at(&mut StdRng::seed_from_u64(7), 1_000);
        assert_eq!(a, b);
        let c = ViewEvent::generate_at(&mut StdRng::seed_from_u64(8), 1_000);
        assert_ne!(a.cart_token, c.cart_token);
    }
}
