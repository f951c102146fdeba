//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::fixtures::TestIdentity;

/// Generate a deterministic identity.
pub fn identity() -> impl Strategy<Value = TestIdentity> {
    any::<[u8; 32]>().prop_map(TestIdentity::with_seed)
}

/// Right ascension in the `HHh MMm SS.Ss` notation.
pub fn right_ascension() -> impl Strategy<Value = String> {
    (0u8..24, 0u8..60, 0u16..600).prop_map(|(h, m, ds)| format!("{h}h {m}m {}.{}s", ds / 10, ds % 10))
}

/// Declination in the `±DD° MM' SS.S` notation.
pub fn declination() -> impl Strategy<Value = String> {
    (-89i8..=89, 0u8..60, 0u16..600)
        .prop_map(|(d, m, ds)| format!("{d}° {m}' {}.{}", ds / 10, ds % 10))
}

/// Parameters for a star payload.
#[derive(Debug, Clone)]
pub struct StarParams {
    pub ra: String,
    pub dec: String,
    pub story: Option<String>,
}

impl Arbitrary for StarParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (right_ascension(), declination(), proptest::option::of("[ -~]{0,250}"))
            .prop_map(|(ra, dec, story)| StarParams { ra, dec, story })
            .boxed()
    }
}

/// Build the payload a client submits for a star.
pub fn star_payload(params: &StarParams) -> Value {
    let mut star = json!({"ra": params.ra, "dec": params.dec});
    if let Some(story) = &params.story {
        star["story"] = json!(story);
    }
    json!({ "star": star })
}
