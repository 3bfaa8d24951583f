//! macOS implementation using the IOKit `AppleLMUController` service.
//!
//! The controller answers method selector 0 with two 64-bit light levels;
//! the first one is used. Locking calls `CGSCreateLoginSession`, which
//! switches to the login window the same way fast user switching does.

use crate::sensor::types::{LightSensor, ScreenLocker, SensorError, SensorReading};
use core_foundation::dictionary::CFMutableDictionaryRef;
use std::ffi::{c_char, c_void, CStr};

#[allow(non_camel_case_types)]
type kern_return_t = i32;
#[allow(non_camel_case_types)]
type mach_port_t = u32;
#[allow(non_camel_case_types)]
type io_object_t = mach_port_t;
#[allow(non_camel_case_types)]
type io_service_t = io_object_t;
#[allow(non_camel_case_types)]
type io_connect_t = io_object_t;

const KERN_SUCCESS: kern_return_t = 0;
/// `kIOReturnBusy`
const IO_RETURN_BUSY: kern_return_t = 0xe000_02d5_u32 as i32;
/// `kIOMainPortDefault` is `MACH_PORT_NULL`.
const IO_MAIN_PORT_DEFAULT: mach_port_t = 0;
const IO_OBJECT_NULL: io_object_t = 0;

const SERVICE_NAME: &[u8] = b"AppleLMUController\0";
const GET_SENSOR_READING_ID: u32 = 0;

#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOServiceMatching(name: *const c_char) -> CFMutableDictionaryRef;
    fn IOServiceGetMatchingService(
        main_port: mach_port_t,
        matching: CFMutableDictionaryRef,
    ) -> io_service_t;
    fn IOServiceOpen(
        service: io_service_t,
        owning_task: mach_port_t,
        kind: u32,
        connect: *mut io_connect_t,
    ) -> kern_return_t;
    fn IOServiceClose(connect: io_connect_t) -> kern_return_t;
    fn IOObjectRelease(object: io_object_t) -> kern_return_t;
    fn IOConnectCallMethod(
        connection: mach_port_t,
        selector: u32,
        input: *const u64,
        input_count: u32,
        input_struct: *const c_void,
        input_struct_count: usize,
        output: *mut u64,
        output_count: *mut u32,
        output_struct: *mut c_void,
        output_struct_count: *mut usize,
    ) -> kern_return_t;
}

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn CGSCreateLoginSession(session: *mut u32) -> i32;
}

extern "C" {
    static mach_task_self_: mach_port_t;
    fn mach_error_string(code: kern_return_t) -> *const c_char;
}

fn error_message(code: kern_return_t) -> String {
    // SAFETY: mach_error_string returns a static, NUL-terminated string.
    unsafe {
        let ptr = mach_error_string(code);
        if ptr.is_null() {
            format!("kern_return {code:#x}")
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    }
}

/// Ambient light sensor connection.
pub struct MacOSSensor {
    port: io_connect_t,
}

impl MacOSSensor {
    /// Find the `AppleLMUController` service and open a connection to it.
    pub fn open() -> Result<Self, SensorError> {
        // SAFETY: IOServiceGetMatchingService consumes the matching dictionary;
        // the service object is released once the connection is open.
        unsafe {
            let matching = IOServiceMatching(SERVICE_NAME.as_ptr() as *const c_char);
            if matching.is_null() {
                return Err(SensorError::NotFound);
            }

            let service = IOServiceGetMatchingService(IO_MAIN_PORT_DEFAULT, matching);
            if service == IO_OBJECT_NULL {
                return Err(SensorError::NotFound);
            }

            let mut port: io_connect_t = 0;
            let ret = IOServiceOpen(service, mach_task_self_, 0, &mut port);
            IOObjectRelease(service);

            if ret != KERN_SUCCESS {
                return Err(SensorError::OpenFailed {
                    code: ret,
                    message: format!("IOServiceOpen: {}", error_message(ret)),
                });
            }

            tracing::debug!(port, "opened AppleLMUController");
            Ok(Self { port })
        }
    }
}

impl LightSensor for MacOSSensor {
    fn read(&mut self) -> Result<SensorReading, SensorError> {
        let mut values = [0u64; 2];
        let mut count = values.len() as u32;

        // SAFETY: `values` has room for `count` scalar outputs.
        let ret = unsafe {
            IOConnectCallMethod(
                self.port,
                GET_SENSOR_READING_ID,
                std::ptr::null(),
                0,
                std::ptr::null(),
                0,
                values.as_mut_ptr(),
                &mut count,
                std::ptr::null_mut(),
                std::ptr::null_mut(),
            )
        };

        match ret {
            KERN_SUCCESS => Ok(SensorReading::Value(values[0])),
            IO_RETURN_BUSY => Ok(SensorReading::Busy),
            code => Err(SensorError::ReadFailed {
                code,
                message: format!("IOConnectCallMethod: {}", error_message(code)),
            }),
        }
    }

    fn describe(&self) -> String {
        "AppleLMUController".to_string()
    }
}

impl Drop for MacOSSensor {
    fn drop(&mut self) {
        // SAFETY: the port was returned by IOServiceOpen and is closed once.
        unsafe {
            IOServiceClose(self.port);
        }
    }
}

/// Switches to the login window.
#[derive(Debug, Default)]
pub struct MacOSLocker;

impl ScreenLocker for MacOSLocker {
    fn lock(&mut self) {
        let mut session = 0u32;
        // SAFETY: the out-parameter points to a valid u32.
        let err = unsafe { CGSCreateLoginSession(&mut session) };
        if err != 0 {
            tracing::warn!("CGSCreateLoginSession failed with error {err}");
        } else {
            tracing::info!(session, "switched to login window");
        }
    }
}
