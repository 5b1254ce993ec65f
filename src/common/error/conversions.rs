//! Error conversion implementations.
//!
//! From impls folding the layer-specific errors into the unified
//! [`Error`](super::types::Error).

use super::types::Error;
use crate::ooxml::OoxmlError;
use crate::ooxml::opc::error::OpcError;

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Io(e) => Error::Io(e),
            OoxmlError::Opc(e) => Error::from(e),
            OoxmlError::UnsupportedImage(s) => Error::Image(s),
            other => Error::Package(other.to_string()),
        }
    }
}

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            OpcError::IoError(e) => Error::Io(e),
            other => Error::Package(other.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            other => Error::Image(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_stay_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(OoxmlError::Opc(OpcError::IoError(io)));
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_package_errors() {
        let err = Error::from(OoxmlError::PartNotFound("/ppt/presentation.xml".into()));
        assert!(matches!(err, Error::Package(ref s) if s.contains("presentation.xml")));
        assert!(!err.is_degradable());
        assert!(Error::RenderingUnavailable("no soffice".into()).is_degradable());
    }
}
