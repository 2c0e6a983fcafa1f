//! Attribute, parameter and address codes used by the extractor and the
//! reply writer.

use aebridge_core::FourCharCode;

const fn code(bytes: &[u8; 4]) -> FourCharCode {
    FourCharCode::from_bytes(*bytes)
}

// ---------------------------------------------------------------------------
// Event attributes
// ---------------------------------------------------------------------------

/// `keyEventClassAttr`, the suite code.
pub const KEY_EVENT_CLASS_ATTR: FourCharCode = code(b"evcl");
/// `keyEventIDAttr`, the event code.
pub const KEY_EVENT_ID_ATTR: FourCharCode = code(b"evid");
/// `keyTransactionIDAttr`.
pub const KEY_TRANSACTION_ID_ATTR: FourCharCode = code(b"tran");
/// `keyAddressAttr`, the addressed application.
pub const KEY_ADDRESS_ATTR: FourCharCode = code(b"addr");
/// `keyOriginalAddressAttr`, the sending application.
pub const KEY_ORIGINAL_ADDRESS_ATTR: FourCharCode = code(b"from");
/// `keySenderPIDAttr`.
pub const KEY_SENDER_PID_ATTR: FourCharCode = code(b"spid");

// ---------------------------------------------------------------------------
// Address descriptor types
// ---------------------------------------------------------------------------

/// `typeApplicationBundleID`, UTF-8 bundle identifier.
pub const TYPE_APPLICATION_BUNDLE_ID: FourCharCode = code(b"bund");
/// `typeProcessSerialNumber`, legacy process handle.
pub const TYPE_PROCESS_SERIAL_NUMBER: FourCharCode = code(b"psn ");
/// `typeKernelProcessID`, a `pid_t`.
pub const TYPE_KERNEL_PROCESS_ID: FourCharCode = code(b"kpid");

/// Stand-in for an application addressed by process serial number. Name
/// resolution for serial numbers is not attempted.
pub const PROCESS_SERIAL_NUMBER_PLACEHOLDER: &str = "<process serial number>";

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// `keyDirectObject`.
pub const KEY_DIRECT_OBJECT: FourCharCode = code(b"----");
/// `keyAEFile`.
pub const KEY_FILE: FourCharCode = code(b"kfil");
/// `keyAEFileType`.
pub const KEY_FILE_TYPE: FourCharCode = code(b"fltp");
/// `keyAEInsertHere`, the insertion location.
pub const KEY_INSERT_HERE: FourCharCode = code(b"insh");
/// `keyAEPropData`, initial properties.
pub const KEY_PROP_DATA: FourCharCode = code(b"prdt");
/// `keyAEData`.
pub const KEY_DATA: FourCharCode = code(b"data");
/// `keyAEObjectClass`.
pub const KEY_OBJECT_CLASS: FourCharCode = code(b"kocl");
/// JavaScript source passed to browser scripting commands.
pub const KEY_JAVASCRIPT: FourCharCode = code(b"JvSc");

/// Parameters decoded after the direct object, when present.
pub const WELL_KNOWN_PARAMETERS: [FourCharCode; 7] = [
    KEY_FILE,
    KEY_FILE_TYPE,
    KEY_INSERT_HERE,
    KEY_PROP_DATA,
    KEY_DATA,
    KEY_OBJECT_CLASS,
    KEY_JAVASCRIPT,
];

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// `keyErrorNumber`.
pub const KEY_ERROR_NUMBER: FourCharCode = code(b"errn");
/// `keyErrorString`.
pub const KEY_ERROR_STRING: FourCharCode = code(b"errs");
