// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TLS credentials for the device channels.
//!
//! The box serves a self-signed certificate and expects a client
//! certificate. Credentials are read from disk by the host; nothing is
//! bundled with the library.

use std::fmt;
use std::path::Path;

use crate::error::Error;

/// TLS settings used when connecting to the box.
///
/// # Examples
///
/// ```no_run
/// use labox_lib::protocol::TlsConfig;
///
/// let tls = TlsConfig::from_files("ca_certificat.pem", "keystore.p12", "secret")?;
/// assert!(tls.accepts_invalid_certs());
/// # Ok::<(), labox_lib::Error>(())
/// ```
#[derive(Clone)]
pub struct TlsConfig {
    ca_pem: Option<Vec<u8>>,
    identity: Option<(Vec<u8>, String)>,
    accept_invalid_certs: bool,
}

impl TlsConfig {
    /// Creates a configuration without credentials that accepts the box's
    /// self-signed certificate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ca_pem: None,
            identity: None,
            accept_invalid_certs: true,
        }
    }

    /// Reads a PEM CA certificate and a PKCS#12 client keystore.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] if either file cannot be read.
    pub fn from_files(
        ca_pem: impl AsRef<Path>,
        pkcs12: impl AsRef<Path>,
        passphrase: impl Into<String>,
    ) -> Result<Self, Error> {
        let ca = read(ca_pem.as_ref())?;
        let keystore = read(pkcs12.as_ref())?;
        Ok(Self::new()
            .with_ca_pem(ca)
            .with_identity(keystore, passphrase))
    }

    /// Sets the CA certificate (PEM).
    #[must_use]
    pub fn with_ca_pem(mut self, pem: Vec<u8>) -> Self {
        self.ca_pem = Some(pem);
        self
    }

    /// Sets the client identity (PKCS#12 keystore and its passphrase).
    #[must_use]
    pub fn with_identity(mut self, pkcs12: Vec<u8>, passphrase: impl Into<String>) -> Self {
        self.identity = Some((pkcs12, passphrase.into()));
        self
    }

    /// Sets whether certificates that fail validation are accepted.
    ///
    /// Defaults to `true`: the box presents a self-signed certificate.
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Returns `true` if invalid certificates are accepted.
    #[must_use]
    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    /// Returns `true` if a client identity is configured.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }

    /// Builds a native TLS connector from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] if the certificate or keystore is invalid.
    #[cfg(feature = "tls")]
    pub fn build_connector(&self) -> Result<native_tls::TlsConnector, Error> {
        let mut builder = native_tls::TlsConnector::builder();
        builder.danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(pem) = &self.ca_pem {
            let certificate = native_tls::Certificate::from_pem(pem)
                .map_err(|e| Error::Tls(format!("invalid CA certificate: {e}")))?;
            builder.add_root_certificate(certificate);
        }
        if let Some((pkcs12, passphrase)) = &self.identity {
            let identity = native_tls::Identity::from_pkcs12(pkcs12, passphrase)
                .map_err(|e| Error::Tls(format!("invalid client keystore: {e}")))?;
            builder.identity(identity);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("cannot build TLS connector: {e}")))
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfig")
            .field("ca_pem", &self.ca_pem.as_ref().map(Vec::len))
            .field("identity", &self.identity.as_ref().map(|_| "<redacted>"))
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

fn read(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| Error::Tls(format!("cannot read {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_self_signed() {
        let tls = TlsConfig::default();
        assert!(tls.accepts_invalid_certs());
        assert!(!tls.has_identity());
    }

    #[test]
    fn missing_files_are_reported() {
        let err = TlsConfig::from_files("/nonexistent/ca.pem", "/nonexistent/k.p12", "x")
            .unwrap_err();
        assert!(matches!(err, Error::Tls(msg) if msg.contains("/nonexistent/ca.pem")));
    }

    #[test]
    fn debug_hides_passphrase() {
        let tls = TlsConfig::new().with_identity(vec![1, 2, 3], "hunter2");
        let debug = format!("{tls:?}");
        assert!(!debug.contains("hunter2"));
        assert!(tls.has_identity());
    }

    #[cfg(feature = "tls")]
    #[test]
    fn invalid_keystore_is_rejected() {
        let tls = TlsConfig::new().with_identity(b"not a keystore".to_vec(), "x");
        assert!(matches!(tls.build_connector(), Err(Error::Tls(_))));
    }
}
