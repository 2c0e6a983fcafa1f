//! Apple Event Manager backend.
//!
//! The OS calls one C trampoline for every installed `(suite, event)` pair.
//! The trampoline forwards to a single process-wide [`EventBridge`], set up
//! through [`init`] or lazily by [`bridge`].

#![allow(unsafe_code)]

use std::ffi::c_void;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::sync::OnceLock;

use aebridge_core::FourCharCode;
use aebridge_descriptor::Descriptor;
use aebridge_descriptor::types::TYPE_RECORD;
use aebridge_sys as sys;
use tracing::{error, warn};

use crate::backend::{EventManager, InboundEvent, ReplySlot};
use crate::bridge::{BridgeOptions, CallbackStatus, EventBridge};
use crate::keywords::KEY_ERROR_NUMBER;
use crate::reply::ReplyValue;
use crate::status::OsStatus;

static BRIDGE: OnceLock<EventBridge<MacEventManager>> = OnceLock::new();

/// Set up the process-wide bridge with `options`.
///
/// Only the first call configures the bridge; later calls return the
/// existing one unchanged.
pub fn init(options: BridgeOptions) -> &'static EventBridge<MacEventManager> {
    BRIDGE.get_or_init(|| EventBridge::with_options(MacEventManager(()), options))
}

/// Set up the process-wide bridge on a Tokio runtime, used for reply
/// timeouts. Same first-call-wins rule as [`init`].
pub fn init_with_runtime(
    options: BridgeOptions,
    runtime: tokio::runtime::Handle,
) -> &'static EventBridge<MacEventManager> {
    BRIDGE.get_or_init(|| {
        EventBridge::with_options(MacEventManager(()), options).with_runtime(runtime)
    })
}

/// The process-wide bridge, created with default options if needed.
pub fn bridge() -> &'static EventBridge<MacEventManager> {
    init(BridgeOptions::default())
}

/// Run the main run loop, which is where the OS delivers Apple Events,
/// until [`stop_event_loop`] is called. Call from the main thread.
pub fn run_event_loop() {
    // SAFETY: no preconditions; returns once the loop is stopped.
    unsafe { sys::CFRunLoopRun() }
}

/// Stop a loop started by [`run_event_loop`]. Callable from any thread.
pub fn stop_event_loop() {
    // SAFETY: the main run loop exists for the lifetime of the process.
    unsafe { sys::CFRunLoopStop(sys::CFRunLoopGetMain()) }
}

unsafe extern "C" fn handle_apple_event(
    event: *const sys::AppleEvent,
    reply: *mut sys::AppleEvent,
    _refcon: sys::SRefCon,
) -> sys::OSErr {
    let Some(bridge) = BRIDGE.get() else {
        return sys::errAEEventNotHandled;
    };
    if event.is_null() {
        return sys::errAEEventNotHandled;
    }

    let event = MacEvent { event };
    // SAFETY: the OS hands us a valid (possibly null-typed) reply for the
    // duration of this call.
    let reply = unsafe { MacReply::from_raw(reply) };

    let status = catch_unwind(AssertUnwindSafe(|| bridge.handle_event(&event, reply)))
        .unwrap_or_else(|_| {
            error!("Apple Event handler panicked");
            CallbackStatus::Failed(OsStatus::EVENT_FAILED)
        });
    to_os_err(status.os_status())
}

fn to_os_err(status: OsStatus) -> sys::OSErr {
    sys::OSErr::try_from(status.0).unwrap_or(sys::OSErr::MIN)
}

/// The Apple Event Manager as an [`EventManager`].
///
/// Only reachable through the process-wide bridge, since the trampoline
/// has no other way to find it.
#[derive(Debug)]
pub struct MacEventManager(());

impl EventManager for MacEventManager {
    type Event = MacEvent;
    type Reply = MacReply;
    type Suspended = MacSuspended;

    fn install_handler(&self, suite: FourCharCode, event: FourCharCode) -> Result<(), OsStatus> {
        // SAFETY: the trampoline is a valid `extern "C"` function for the
        // lifetime of the process and ignores its refcon.
        let err = unsafe {
            sys::AEInstallEventHandler(
                suite.as_u32(),
                event.as_u32(),
                Some(handle_apple_event),
                ptr::null_mut(),
                0,
            )
        };
        OsStatus::from(err).check()
    }

    fn suspend(&self, event: &MacEvent) -> Result<MacSuspended, OsStatus> {
        // SAFETY: `event` wraps the event currently being delivered.
        let err = unsafe { sys::AESuspendTheCurrentEvent(event.event) };
        OsStatus::from(err).check()?;
        // SAFETY: still valid; a suspended event is not disposed of by the OS.
        let desc = unsafe { ptr::read_unaligned(event.event) };
        Ok(MacSuspended { event: desc })
    }

    fn resume(
        &self,
        suspended: MacSuspended,
        mut reply: MacReply,
        status: OsStatus,
    ) -> Result<(), OsStatus> {
        if !status.is_ok()
            && let Err(err) = reply.put_parameter(KEY_ERROR_NUMBER, &ReplyValue::Integer(status.0))
        {
            warn!(status = %err, "Failed to write error number into reply");
        }
        // SAFETY: both descriptors were captured at suspension and are
        // resumed exactly once, here.
        let err = unsafe {
            sys::AEResumeTheCurrentEvent(
                &raw const suspended.event,
                &raw const reply.reply,
                sys::kAENoDispatch,
                ptr::null_mut(),
            )
        };
        OsStatus::from(err).check()
    }
}

/// An inbound event, borrowed for the duration of the OS callback.
#[derive(Debug)]
pub struct MacEvent {
    event: *const sys::AppleEvent,
}

impl InboundEvent for MacEvent {
    type Descriptor = MacDescriptor;

    fn attribute(&self, keyword: FourCharCode) -> Option<MacDescriptor> {
        MacDescriptor::fetch(|out| {
            // SAFETY: `self.event` is valid during the callback.
            unsafe {
                sys::AEGetAttributeDesc(self.event, keyword.as_u32(), sys::typeWildCard, out)
            }
        })
    }

    fn parameter(&self, keyword: FourCharCode) -> Option<MacDescriptor> {
        MacDescriptor::fetch(|out| {
            // SAFETY: `self.event` is valid during the callback.
            unsafe { sys::AEGetParamDesc(self.event, keyword.as_u32(), sys::typeWildCard, out) }
        })
    }
}

/// The reply event of a request.
#[derive(Debug)]
pub struct MacReply {
    reply: sys::AEDesc,
}

// SAFETY: the reply descriptor is an OS handle with no thread affinity;
// ownership moves with the pending reply and it is used by one thread at a
// time.
unsafe impl Send for MacReply {}

impl MacReply {
    /// `None` when the sender does not wait for a reply.
    ///
    /// # Safety
    ///
    /// `reply` must be null or point to a valid `AEDesc`.
    unsafe fn from_raw(reply: *mut sys::AppleEvent) -> Option<Self> {
        if reply.is_null() {
            return None;
        }
        // SAFETY: non-null and valid per the caller.
        let desc = unsafe { ptr::read_unaligned(reply) };
        if { desc.descriptorType } == sys::typeNull || { desc.dataHandle }.is_null() {
            return None;
        }
        Some(Self { reply: desc })
    }
}

impl ReplySlot for MacReply {
    fn put_parameter(&mut self, keyword: FourCharCode, value: &ReplyValue) -> Result<(), OsStatus> {
        let byte;
        let (desc_type, data, len): (sys::DescType, *const c_void, sys::Size) = match value {
            ReplyValue::Text(text) => (
                sys::typeUTF8Text,
                text.as_ptr().cast(),
                byte_len(text.len()),
            ),
            ReplyValue::Integer(n) => (
                sys::typeSInt32,
                ptr::from_ref(n).cast(),
                byte_len(size_of::<i32>()),
            ),
            ReplyValue::Float(n) => (
                sys::typeIEEE64BitFloatingPoint,
                ptr::from_ref(n).cast(),
                byte_len(size_of::<f64>()),
            ),
            ReplyValue::Boolean(b) => {
                byte = u8::from(*b);
                (sys::typeBoolean, ptr::from_ref(&byte).cast(), 1)
            },
            ReplyValue::Null => (sys::typeNull, ptr::null(), 0),
        };
        // SAFETY: `data` points to `len` readable bytes that outlive the call.
        let err = unsafe {
            sys::AEPutParamPtr(&raw mut self.reply, keyword.as_u32(), desc_type, data, len)
        };
        OsStatus::from(err).check()
    }
}

fn byte_len(len: usize) -> sys::Size {
    sys::Size::try_from(len).unwrap_or(sys::Size::MAX)
}

/// A suspended event awaiting resumption.
#[derive(Debug)]
pub struct MacSuspended {
    event: sys::AEDesc,
}

// SAFETY: see `MacReply`.
unsafe impl Send for MacSuspended {}

/// An owned descriptor, disposed of on drop.
#[derive(Debug)]
pub struct MacDescriptor {
    desc: sys::AEDesc,
}

impl MacDescriptor {
    fn fetch(get: impl FnOnce(*mut sys::AEDesc) -> sys::OSErr) -> Option<Self> {
        let mut desc = sys::AEDesc::null();
        let err = get(&raw mut desc);
        if err == sys::noErr {
            Some(Self { desc })
        } else {
            None
        }
    }

    fn as_ptr(&self) -> *const sys::AEDesc {
        &raw const self.desc
    }

    fn key_desc(&self, keyword: FourCharCode) -> Option<Self> {
        Self::fetch(|out| {
            // SAFETY: `self.desc` is a live descriptor.
            unsafe { sys::AEGetKeyDesc(self.as_ptr(), keyword.as_u32(), sys::typeWildCard, out) }
        })
    }

    fn coerce(&self, to: sys::DescType) -> Option<Self> {
        Self::fetch(|out| {
            // SAFETY: `self.desc` is a live descriptor.
            unsafe { sys::AECoerceDesc(self.as_ptr(), to, out) }
        })
    }
}

impl Drop for MacDescriptor {
    fn drop(&mut self) {
        // SAFETY: we own this descriptor and dispose of it exactly once.
        unsafe {
            sys::AEDisposeDesc(&raw mut self.desc);
        }
    }
}

impl Descriptor for MacDescriptor {
    fn descriptor_type(&self) -> FourCharCode {
        FourCharCode::new({ self.desc.descriptorType })
    }

    fn data_size(&self) -> usize {
        // SAFETY: `self.desc` is a live descriptor.
        let size = unsafe { sys::AEGetDescDataSize(self.as_ptr()) };
        usize::try_from(size).unwrap_or(0)
    }

    fn data(&self) -> Option<Vec<u8>> {
        let size = self.data_size();
        let mut buf = vec![0_u8; size];
        // SAFETY: `buf` has exactly `size` writable bytes.
        let err = unsafe {
            sys::AEGetDescData(
                self.as_ptr(),
                buf.as_mut_ptr().cast::<c_void>(),
                sys::Size::try_from(size).ok()?,
            )
        };
        (err == sys::noErr).then_some(buf)
    }

    fn text(&self) -> Option<String> {
        if { self.desc.descriptorType } == sys::typeUTF8Text {
            return String::from_utf8(self.data()?).ok();
        }
        let utf8 = self.coerce(sys::typeUTF8Text)?;
        String::from_utf8(utf8.data()?).ok()
    }

    fn count_items(&self) -> Option<usize> {
        let mut count = 0_i32;
        // SAFETY: `self.desc` is a live descriptor.
        let err = unsafe { sys::AECountItems(self.as_ptr(), &raw mut count) };
        if err != sys::noErr {
            return None;
        }
        usize::try_from(count).ok()
    }

    fn nth_item(&self, index: usize) -> Option<(FourCharCode, Self)> {
        let index = i32::try_from(index).ok()?;
        let mut keyword: sys::AEKeyword = 0;
        let item = Self::fetch(|out| {
            // SAFETY: `self.desc` is a live list or record.
            unsafe {
                sys::AEGetNthDesc(self.as_ptr(), index, sys::typeWildCard, &raw mut keyword, out)
            }
        })?;
        Some((FourCharCode::new(keyword), item))
    }

    fn key(&self, keyword: FourCharCode) -> Option<Self> {
        self.key_desc(keyword).or_else(|| {
            // Object specifiers only expose their keys once coerced to a record.
            self.coerce(TYPE_RECORD.as_u32())?.key_desc(keyword)
        })
    }
}
