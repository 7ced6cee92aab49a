// Copyright 2025 the lucent authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The error taxonomy for device and resource operations.
//!
//! Every creation function returns a typed result. On any failure partway
//! through a multi-step creation, all previously-allocated sub-resources for
//! that object are released before returning; no partially-constructed
//! object is ever handed to the caller.

use super::enums::BackendKind;
use std::collections::TryReserveError;
use std::fmt;

/// An error produced by a [`RenderDevice`](super::RenderDevice) operation or
/// a resource that builds on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Host (CPU) memory allocation failed. Reported, never retried
    /// internally, never silently degraded.
    OutOfHostMemory,
    /// Device (GPU) memory allocation failed.
    OutOfDeviceMemory,
    /// An enum value or feature has no mapping on the active backend.
    /// This is a configuration/compatibility error, not a transient one,
    /// and is never retried.
    Unsupported {
        /// What was requested (e.g. `"triangle-fan topology"`).
        what: String,
        /// The backend that rejected the request.
        backend: BackendKind,
    },
    /// Shader compilation or linking failed.
    BadShaderCode {
        /// A descriptive label for the shader, if one was supplied.
        label: String,
        /// The diagnostic string provided by the backend.
        details: String,
    },
    /// An ID referenced a resource that does not exist (already destroyed,
    /// or produced by a different device).
    InvalidHandle {
        /// The resource category of the stale handle.
        what: &'static str,
    },
    /// An opaque backend failure code, preserved for logging but not
    /// further classified.
    Unknown(i64),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::OutOfHostMemory => write!(f, "Out of host memory."),
            DeviceError::OutOfDeviceMemory => write!(f, "Out of device memory."),
            DeviceError::Unsupported { what, backend } => {
                write!(f, "The {backend} backend does not support {what}.")
            }
            DeviceError::BadShaderCode { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
            DeviceError::InvalidHandle { what } => {
                write!(f, "Invalid {what} handle.")
            }
            DeviceError::Unknown(code) => {
                write!(f, "Unknown backend error (code {code}).")
            }
        }
    }
}

impl std::error::Error for DeviceError {}

impl From<TryReserveError> for DeviceError {
    fn from(_: TryReserveError) -> Self {
        DeviceError::OutOfHostMemory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display_names_the_backend() {
        let err = DeviceError::Unsupported {
            what: "triangle-fan topology".to_string(),
            backend: BackendKind::Explicit,
        };
        assert_eq!(
            format!("{err}"),
            "The explicit backend does not support triangle-fan topology."
        );
    }

    #[test]
    fn test_bad_shader_code_display_carries_diagnostic() {
        let err = DeviceError::BadShaderCode {
            label: "sky.vert".to_string(),
            details: "unknown identifier 'view_proj'".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Shader compilation failed for 'sky.vert': unknown identifier 'view_proj'"
        );
    }

    #[test]
    fn test_try_reserve_error_maps_to_out_of_host_memory() {
        let mut v: Vec<u8> = Vec::new();
        let err = v.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(DeviceError::from(err), DeviceError::OutOfHostMemory);
    }
}
