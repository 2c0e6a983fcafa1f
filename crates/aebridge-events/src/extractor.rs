//! Turning an inbound event into an [`EventRecord`].

use aebridge_core::{DIRECT_PARAMETER, EventRecord, FourCharCode};
use aebridge_descriptor::{Decoder, Descriptor};
use tracing::trace;

use crate::backend::InboundEvent;
use crate::keywords::{
    KEY_ADDRESS_ATTR, KEY_DIRECT_OBJECT, KEY_EVENT_CLASS_ATTR, KEY_EVENT_ID_ATTR,
    KEY_ORIGINAL_ADDRESS_ATTR, KEY_SENDER_PID_ATTR, KEY_TRANSACTION_ID_ATTR,
    PROCESS_SERIAL_NUMBER_PLACEHOLDER, TYPE_APPLICATION_BUNDLE_ID, TYPE_KERNEL_PROCESS_ID,
    TYPE_PROCESS_SERIAL_NUMBER, WELL_KNOWN_PARAMETERS,
};

/// Builds [`EventRecord`]s from inbound events.
///
/// Extraction never fails. Missing attributes leave fields empty or unset,
/// missing parameters are left out of the record.
#[derive(Debug, Clone)]
pub struct EventExtractor {
    decoder: Decoder,
    parameters: Vec<FourCharCode>,
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EventExtractor {
    /// An extractor using the default decoder and the well-known parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoder: Decoder::new(),
            parameters: WELL_KNOWN_PARAMETERS.to_vec(),
        }
    }

    /// Use a differently configured decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Also decode these parameter codes when present.
    #[must_use]
    pub fn with_extra_parameters(
        mut self,
        extra: impl IntoIterator<Item = FourCharCode>,
    ) -> Self {
        for code in extra {
            if code != KEY_DIRECT_OBJECT && !self.parameters.contains(&code) {
                self.parameters.push(code);
            }
        }
        self
    }

    /// The decoder in use.
    #[must_use]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Parameter codes decoded after the direct object.
    #[must_use]
    pub fn parameters(&self) -> &[FourCharCode] {
        &self.parameters
    }

    /// Extract a record from `event`.
    pub fn extract<E: InboundEvent>(&self, event: &E) -> EventRecord {
        let suite = read_code_string(event, KEY_EVENT_CLASS_ATTR);
        let id = read_code_string(event, KEY_EVENT_ID_ATTR);
        let mut record = EventRecord::new(suite, id);

        if let Some(tran) = event
            .attribute(KEY_TRANSACTION_ID_ATTR)
            .and_then(|desc| desc.read_i32())
        {
            record = record.with_transaction_id(tran);
        }

        if let Some(target) = event
            .attribute(KEY_ADDRESS_ATTR)
            .and_then(|desc| resolve_address(&desc))
        {
            record = record.with_target_app(target);
        }

        if let Some(source) = source_app(event) {
            record = record.with_source_app(source);
        }

        if let Some(direct) = event.parameter(KEY_DIRECT_OBJECT) {
            let mut value = self.decoder.decode(&direct);
            value.summarize();
            record = record.with_parameter(DIRECT_PARAMETER, value);
        }

        for &key in &self.parameters {
            let Some(desc) = event.parameter(key) else {
                continue;
            };
            let mut value = self.decoder.decode(&desc);
            value.summarize();
            record = record.with_parameter(key.to_string(), value);
        }

        trace!(
            suite = record.suite(),
            event = record.event(),
            parameters = record.parameters().len(),
            "Extracted event record"
        );
        record
    }
}

fn read_code_string<E: InboundEvent>(event: &E, keyword: FourCharCode) -> String {
    event
        .attribute(keyword)
        .and_then(|desc| desc.read_code())
        .map(|code| code.to_string())
        .unwrap_or_default()
}

fn source_app<E: InboundEvent>(event: &E) -> Option<String> {
    event
        .attribute(KEY_ORIGINAL_ADDRESS_ATTR)
        .and_then(|desc| resolve_address(&desc))
        .or_else(|| {
            event
                .attribute(KEY_SENDER_PID_ATTR)
                .and_then(|desc| desc.read_i32())
                .map(format_pid)
        })
}

/// Resolve an address descriptor to an application name.
///
/// Bundle identifiers are returned as-is, process ids as `PID:<n>`. Serial
/// numbers only yield a placeholder.
pub fn resolve_address<D: Descriptor>(desc: &D) -> Option<String> {
    match desc.descriptor_type() {
        TYPE_APPLICATION_BUNDLE_ID => desc
            .data()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .filter(|bundle| !bundle.is_empty()),
        TYPE_PROCESS_SERIAL_NUMBER => Some(PROCESS_SERIAL_NUMBER_PLACEHOLDER.to_string()),
        TYPE_KERNEL_PROCESS_ID => desc.read_i32().map(format_pid),
        _ => None,
    }
}

fn format_pid(pid: i32) -> String {
    format!("PID:{pid}")
}
