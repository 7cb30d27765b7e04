//! Windows DPAPI protection backend.
//!
//! Transforms bytes through `CryptProtectData`/`CryptUnprotectData`, scoped
//! to the current user, with interactive prompts disabled. An application
//! description string accompanies each blob so credential tooling can tell
//! who wrote it; it carries no semantic weight.

#![allow(unsafe_code)]

use crate::error::ProtectError;
use crate::protect::Protector;

/// Protection through the Windows Data Protection API.
///
/// Blobs are bound to the current Windows user: a blob protected under one
/// account fails to unprotect under another, or on another machine.
pub struct DpapiProtector {
    /// UTF-16, NUL-terminated description label.
    description: Vec<u16>,
}

impl DpapiProtector {
    /// Create a protector labeling blobs with `description`.
    pub fn new(description: &str) -> Self {
        let mut wide: Vec<u16> = description.encode_utf16().collect();
        wide.push(0);
        Self { description: wide }
    }
}

impl Protector for DpapiProtector {
    fn protect(&self, plaintext: &[u8]) -> Result<Vec<u8>, ProtectError> {
        let input = win32::DATA_BLOB::borrowed(plaintext);
        let mut output = win32::DATA_BLOB::empty();

        // SAFETY: `input` points at live plaintext for the duration of the
        // call; `output` is filled by the OS and released in `consume`.
        let ok = unsafe {
            win32::CryptProtectData(
                &input,
                self.description.as_ptr(),
                std::ptr::null(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                win32::CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        };
        if ok == 0 {
            return Err(ProtectError::new(format!(
                "CryptProtectData failed (code {})",
                win32::last_error()
            )));
        }

        // SAFETY: on success the OS allocated `output`; `consume` copies it
        // out and frees the allocation.
        Ok(unsafe { win32::consume(&output) })
    }

    fn unprotect(&self, blob: &[u8]) -> Result<Vec<u8>, ProtectError> {
        let input = win32::DATA_BLOB::borrowed(blob);
        let mut output = win32::DATA_BLOB::empty();

        // SAFETY: as in `protect`; the description out-pointer stays null so
        // nothing extra is allocated for us.
        let ok = unsafe {
            win32::CryptUnprotectData(
                &input,
                std::ptr::null_mut(),
                std::ptr::null(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                win32::CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        };
        if ok == 0 {
            return Err(ProtectError::new(format!(
                "CryptUnprotectData failed (code {})",
                win32::last_error()
            )));
        }

        // SAFETY: on success the OS allocated `output`.
        Ok(unsafe { win32::consume(&output) })
    }
}

/// Minimal crypt32/kernel32 declarations.
#[allow(non_snake_case)]
mod win32 {
    use std::ffi::c_void;

    pub const CRYPTPROTECT_UI_FORBIDDEN: u32 = 0x1;

    #[repr(C)]
    pub struct DATA_BLOB {
        pub cbData: u32,
        pub pbData: *mut u8,
    }

    impl DATA_BLOB {
        pub const fn empty() -> Self {
            Self {
                cbData: 0,
                pbData: std::ptr::null_mut(),
            }
        }

        /// View over caller-owned bytes; the OS only reads through it.
        pub fn borrowed(data: &[u8]) -> Self {
            Self {
                cbData: data.len() as u32,
                pbData: data.as_ptr().cast_mut(),
            }
        }
    }

    /// Copy an OS-allocated output blob into owned memory and release the
    /// allocation.
    ///
    /// # Safety
    ///
    /// `blob` must have been filled by a successful DPAPI call and not yet
    /// freed.
    pub unsafe fn consume(blob: &DATA_BLOB) -> Vec<u8> {
        if blob.pbData.is_null() {
            return Vec::new();
        }
        let bytes = std::slice::from_raw_parts(blob.pbData, blob.cbData as usize).to_vec();
        LocalFree(blob.pbData.cast());
        bytes
    }

    pub fn last_error() -> u32 {
        // SAFETY: no preconditions.
        unsafe { GetLastError() }
    }

    #[link(name = "crypt32")]
    extern "system" {
        pub fn CryptProtectData(
            pDataIn: *const DATA_BLOB,
            szDataDescr: *const u16,
            pOptionalEntropy: *const DATA_BLOB,
            pvReserved: *mut c_void,
            pPromptStruct: *mut c_void,
            dwFlags: u32,
            pDataOut: *mut DATA_BLOB,
        ) -> i32;

        pub fn CryptUnprotectData(
            pDataIn: *const DATA_BLOB,
            ppszDataDescr: *mut *mut u16,
            pOptionalEntropy: *const DATA_BLOB,
            pvReserved: *mut c_void,
            pPromptStruct: *mut c_void,
            dwFlags: u32,
            pDataOut: *mut DATA_BLOB,
        ) -> i32;
    }

    #[link(name = "kernel32")]
    extern "system" {
        pub fn GetLastError() -> u32;
        pub fn LocalFree(hMem: *mut c_void) -> *mut c_void;
    }
}
