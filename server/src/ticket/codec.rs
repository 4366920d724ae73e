use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

use super::TicketId;
use crate::utils::error::GuestError;

/// Namespace tag every scannable payload starts with.
pub const PAYLOAD_NAMESPACE: &str = "TG_WEDDING";

pub const DEFAULT_QR_RENDER_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

const PAYLOAD_DELIMITER: char = ':';
const QR_IMAGE_SIZE: &str = "400x400";

/// Result of minting a ticket for a guest name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedTicket {
    pub ticket_id: TicketId,
    pub qr_data: String,
}

/// Mints ticket identifiers and encodes/decodes the payload embedded in a
/// guest's code.
///
/// Identifiers are millisecond timestamps, bumped past the last one issued
/// so two mints in the same millisecond still get distinct, increasing ids.
#[derive(Debug)]
pub struct TicketCodec {
    render_url: String,
    last_issued: AtomicU64,
}

impl TicketCodec {
    pub fn new(render_url: impl Into<String>) -> Self {
        Self {
            render_url: render_url.into(),
            last_issued: AtomicU64::new(0),
        }
    }

    pub fn mint(&self, name: &str, now: DateTime<Utc>) -> Result<MintedTicket, GuestError> {
        if name.trim().is_empty() {
            return Err(GuestError::InvalidInput(
                "guest name must not be empty".to_string(),
            ));
        }

        let ticket_id = TicketId::from_millis(self.next_millis(now));
        let qr_data = encode_payload(&ticket_id, name);

        Ok(MintedTicket { ticket_id, qr_data })
    }

    /// URL of the rendered code image for `qr_data`. Never fetched here.
    pub fn qr_url(&self, qr_data: &str) -> String {
        format!(
            "{}?size={}&data={}",
            self.render_url,
            QR_IMAGE_SIZE,
            urlencoding::encode(qr_data)
        )
    }

    pub fn decode(&self, payload: &str) -> Result<TicketId, GuestError> {
        decode_payload(payload)
    }

    fn next_millis(&self, now: DateTime<Utc>) -> u64 {
        let now_millis = now.timestamp_millis().max(0) as u64;
        let previous = self
            .last_issued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now_millis.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now_millis.max(previous + 1)
    }
}

impl Default for TicketCodec {
    fn default() -> Self {
        Self::new(DEFAULT_QR_RENDER_URL)
    }
}

pub fn encode_payload(ticket_id: &TicketId, name: &str) -> String {
    format!(
        "{ns}{d}{ticket}{d}{name}",
        ns = PAYLOAD_NAMESPACE,
        d = PAYLOAD_DELIMITER,
        ticket = ticket_id,
        name = name
    )
}

/// Extracts the ticket id from a scanned payload. The name field is
/// everything after the second delimiter and may contain delimiters itself.
pub fn decode_payload(payload: &str) -> Result<TicketId, GuestError> {
    let payload = payload.trim();
    let mut fields = payload.splitn(3, PAYLOAD_DELIMITER);

    if fields.next() != Some(PAYLOAD_NAMESPACE) {
        return Err(GuestError::MalformedPayload(format!(
            "payload does not start with {}",
            PAYLOAD_NAMESPACE
        )));
    }

    let (ticket, _name) = match (fields.next(), fields.next()) {
        (Some(ticket), Some(name)) if !ticket.is_empty() => (ticket, name),
        _ => {
            return Err(GuestError::MalformedPayload(
                "payload must carry a ticket id and a name".to_string(),
            ))
        }
    };

    ticket.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn test_mint_formats_ticket_and_payload() {
        let codec = TicketCodec::default();
        let minted = codec.mint("Ada Lovelace", at(1_700_000_000_000)).unwrap();

        assert_eq!(minted.ticket_id.as_str(), "TG-1700000000000");
        assert_eq!(minted.qr_data, "TG_WEDDING:TG-1700000000000:Ada Lovelace");
    }

    #[test]
    fn test_mint_rejects_blank_names() {
        let codec = TicketCodec::default();
        for name in ["", "   ", "\t\n"] {
            assert!(matches!(
                codec.mint(name, at(1)),
                Err(GuestError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_mint_within_same_millisecond_stays_unique() {
        let codec = TicketCodec::default();
        let now = at(5_000);

        let first = codec.mint("A", now).unwrap();
        let second = codec.mint("B", now).unwrap();
        let third = codec.mint("C", at(4_000)).unwrap();

        assert_eq!(first.ticket_id.millis(), 5_000);
        assert_eq!(second.ticket_id.millis(), 5_001);
        assert_eq!(third.ticket_id.millis(), 5_002);
    }

    #[test]
    fn test_decode_rejects_foreign_namespace() {
        let codec = TicketCodec::default();
        assert!(matches!(
            codec.decode("FOO:123:Alice"),
            Err(GuestError::MalformedPayload(_))
        ));
        assert!(matches!(
            codec.decode("TG_WEDDINGX:TG-1:Alice"),
            Err(GuestError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let codec = TicketCodec::default();
        for payload in ["TG_WEDDING", "TG_WEDDING:", "TG_WEDDING:TG-1", "TG_WEDDING::Alice"] {
            assert!(
                matches!(codec.decode(payload), Err(GuestError::MalformedPayload(_))),
                "'{}' should be rejected",
                payload
            );
        }
    }

    #[test]
    fn test_decode_keeps_colons_in_name() {
        let codec = TicketCodec::default();
        let ticket = codec.decode("TG_WEDDING:TG-77:Dr. Who: The Doctor").unwrap();
        assert_eq!(ticket.as_str(), "TG-77");
    }

    #[test]
    fn test_decode_trims_scanner_whitespace() {
        let codec = TicketCodec::default();
        let ticket = codec.decode("  TG_WEDDING:TG-9:Grace\n").unwrap();
        assert_eq!(ticket.as_str(), "TG-9");
    }

    #[test]
    fn test_qr_url_encodes_payload() {
        let codec = TicketCodec::new("https://render.test/qr");
        let url = codec.qr_url("TG_WEDDING:TG-1:Ada Lovelace");
        assert_eq!(
            url,
            "https://render.test/qr?size=400x400&data=TG_WEDDING%3ATG-1%3AAda%20Lovelace"
        );
    }

    proptest! {
        #[test]
        fn prop_decode_returns_minted_ticket(name in "\\PC*[^\\s]\\PC*", millis in 0i64..4_000_000_000_000) {
            let codec = TicketCodec::default();
            let minted = codec.mint(&name, at(millis)).unwrap();
            prop_assert_eq!(codec.decode(&minted.qr_data).unwrap(), minted.ticket_id);
        }
    }
}
