use std::ffi::c_void;

pub type OSErr = i16;
pub type OSStatus = i32;
pub type OSType = u32;
pub type DescType = OSType;
pub type AEKeyword = OSType;
pub type AEEventClass = OSType;
pub type AEEventID = OSType;
pub type Size = isize;
pub type SRefCon = *mut c_void;

pub const noErr: OSErr = 0;
pub const errAEDescNotFound: OSErr = -1701;
pub const errAEEventNotHandled: OSErr = -1708;

/// `typeWildCard`, accepted by the getters to skip coercion.
pub const typeWildCard: DescType = u32::from_be_bytes(*b"****");
/// `typeUTF8Text`.
pub const typeUTF8Text: DescType = u32::from_be_bytes(*b"utf8");
/// `typeNull`.
pub const typeNull: DescType = u32::from_be_bytes(*b"null");
/// `typeSInt32`.
pub const typeSInt32: DescType = u32::from_be_bytes(*b"long");
/// `typeIEEE64BitFloatingPoint`.
pub const typeIEEE64BitFloatingPoint: DescType = u32::from_be_bytes(*b"doub");
/// `typeBoolean`.
pub const typeBoolean: DescType = u32::from_be_bytes(*b"bool");

/// Opaque storage behind a descriptor.
pub type AEDataStorage = *mut c_void;

/// `AEDesc`. The Apple headers pack this struct to 2-byte alignment.
#[repr(C, packed(2))]
#[derive(Debug, Clone, Copy)]
pub struct AEDesc {
    pub descriptorType: DescType,
    pub dataHandle: AEDataStorage,
}

impl AEDesc {
    /// A `typeNull` descriptor with no storage, as `AEInitializeDesc` sets.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            descriptorType: typeNull,
            dataHandle: std::ptr::null_mut(),
        }
    }
}

pub type AppleEvent = AEDesc;
pub type AEDescList = AEDesc;
pub type AERecord = AEDesc;

/// `AESuspendTheCurrentEvent` hands back the event itself as the token.
pub type AppleEventPtr = *const AppleEvent;

pub type AEEventHandlerProcPtr =
    unsafe extern "C" fn(event: *const AppleEvent, reply: *mut AppleEvent, refcon: SRefCon) -> OSErr;
pub type AEEventHandlerUPP = Option<AEEventHandlerProcPtr>;

/// `kAENoDispatch`: resume without calling a handler again.
pub const kAENoDispatch: AEEventHandlerUPP = None;

#[link(name = "CoreServices", kind = "framework")]
unsafe extern "C" {
    pub fn AEInstallEventHandler(
        theAEEventClass: AEEventClass,
        theAEEventID: AEEventID,
        handler: AEEventHandlerUPP,
        handlerRefcon: SRefCon,
        isSysHandler: u8,
    ) -> OSErr;

    pub fn AEGetParamDesc(
        theAppleEvent: *const AppleEvent,
        theAEKeyword: AEKeyword,
        desiredType: DescType,
        result: *mut AEDesc,
    ) -> OSErr;

    pub fn AEGetAttributeDesc(
        theAppleEvent: *const AppleEvent,
        theAEKeyword: AEKeyword,
        desiredType: DescType,
        result: *mut AEDesc,
    ) -> OSErr;

    pub fn AEGetDescDataSize(theAEDesc: *const AEDesc) -> Size;

    pub fn AEGetDescData(theAEDesc: *const AEDesc, dataPtr: *mut c_void, maximumSize: Size) -> OSErr;

    pub fn AECountItems(theAEDescList: *const AEDescList, theCount: *mut i32) -> OSErr;

    pub fn AEGetNthDesc(
        theAEDescList: *const AEDescList,
        index: i32,
        desiredType: DescType,
        theAEKeyword: *mut AEKeyword,
        result: *mut AEDesc,
    ) -> OSErr;

    pub fn AEGetKeyDesc(
        theAERecord: *const AERecord,
        theAEKeyword: AEKeyword,
        desiredType: DescType,
        result: *mut AEDesc,
    ) -> OSErr;

    pub fn AECoerceDesc(theAEDesc: *const AEDesc, toType: DescType, result: *mut AEDesc) -> OSErr;

    pub fn AEDisposeDesc(theAEDesc: *mut AEDesc) -> OSErr;

    pub fn AEPutParamPtr(
        theAppleEvent: *mut AppleEvent,
        theAEKeyword: AEKeyword,
        typeCode: DescType,
        dataPtr: *const c_void,
        dataSize: Size,
    ) -> OSErr;

    pub fn AESuspendTheCurrentEvent(theAppleEvent: *const AppleEvent) -> OSErr;

    pub fn AEResumeTheCurrentEvent(
        theAppleEvent: *const AppleEvent,
        reply: *const AppleEvent,
        dispatcher: AEEventHandlerUPP,
        handlerRefcon: SRefCon,
    ) -> OSErr;
}

/// Opaque run loop.
#[repr(C)]
pub struct __CFRunLoop {
    _private: [u8; 0],
}

pub type CFRunLoopRef = *mut __CFRunLoop;

#[link(name = "CoreFoundation", kind = "framework")]
unsafe extern "C" {
    pub fn CFRunLoopGetMain() -> CFRunLoopRef;

    pub fn CFRunLoopRun();

    pub fn CFRunLoopStop(rl: CFRunLoopRef);
}
