use std::collections::BTreeMap;

use serde::Serialize;

use super::envelope::RxMetadata;
use crate::Coordinates;

/// Gateways that received an uplink: `value` is the count, `context` maps
/// each gateway id to its reception details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewaySummary {
    pub value: usize,
    pub context: BTreeMap<String, GatewayContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayContext {
    pub id: String,
    pub eui: Option<String>,
    pub rssi: Option<f64>,
    pub snr: Option<f64>,
    pub location: Coordinates,
}

/// Summarize reception metadata. A gateway location is only reported when
/// both latitude and longitude are known.
pub fn summarize_gateways(rx_metadata: &[RxMetadata]) -> GatewaySummary {
    let mut context = BTreeMap::new();
    for rx in rx_metadata {
        let (lat, lng) = match rx.location.as_ref() {
            Some(location) => match (location.latitude, location.longitude) {
                (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
                _ => (None, None),
            },
            None => (None, None),
        };
        let id = rx.gateway_ids.gateway_id.clone();
        context.insert(
            id.clone(),
            GatewayContext {
                id,
                eui: rx.gateway_ids.eui.clone(),
                rssi: rx.rssi,
                snr: rx.snr,
                location: Coordinates { lat, lng },
            },
        );
    }
    GatewaySummary {
        value: rx_metadata.len(),
        context,
    }
}

#[cfg(test)]
mod tests {
    use super::summarize_gateways;
    use crate::uplink::envelope::{GatewayIds, GatewayLocation, RxMetadata};

    fn rx(id: &str, location: Option<GatewayLocation>) -> RxMetadata {
        RxMetadata {
            gateway_ids: GatewayIds {
                gateway_id: id.to_string(),
                eui: Some("B827EBFFFE000001".to_string()),
            },
            rssi: Some(-97.0),
            snr: Some(7.25),
            location,
        }
    }

    #[test]
    fn summary_counts_and_keys_gateways() {
        let summary = summarize_gateways(&[
            rx(
                "gw-b",
                Some(GatewayLocation {
                    latitude: Some(-37.8),
                    longitude: Some(144.9),
                }),
            ),
            rx("gw-a", None),
        ]);
        assert_eq!(summary.value, 2);
        let keys: Vec<_> = summary.context.keys().cloned().collect();
        assert_eq!(keys, vec!["gw-a".to_string(), "gw-b".to_string()]);
        assert_eq!(summary.context["gw-b"].location.lat, Some(-37.8));
        assert_eq!(summary.context["gw-a"].location.lng, None);
        assert_eq!(summary.context["gw-a"].rssi, Some(-97.0));
    }

    #[test]
    fn partial_location_is_dropped() {
        let summary = summarize_gateways(&[rx(
            "gw",
            Some(GatewayLocation {
                latitude: Some(1.0),
                longitude: None,
            }),
        )]);
        let location = summary.context["gw"].location;
        assert_eq!(location.lat, None);
        assert_eq!(location.lng, None);
    }

    #[test]
    fn empty_metadata_yields_zero() {
        let summary = summarize_gateways(&[]);
        assert_eq!(summary.value, 0);
        assert!(summary.context.is_empty());
    }
}
