//! Stdio adapter
//!
//! Wraps any [`KeyProvider`] or [`Method`] in the process framing:
//! guard, handshake, read stdin to end, decode, run, respond. Generic over
//! the streams so tests can feed it buffers.

use std::io::{Read, Write};

use serde::Serialize;

use super::capability::{Direction, KeyProvider, Method};
use super::guard::{ensure_piped, OutputProbe};
use crate::protocol::{
    Handshake, KeyProviderRequest, MethodRequest, MethodResponse, PluginError, PluginKind,
};

/// What one successful exchange looked like, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub request_bytes: usize,
    pub response_bytes: usize,

    /// Key provider runs only: whether the request carried metadata
    pub prior_metadata: Option<bool>,
}

pub struct StdioAdapter<'a, R, W> {
    probe: &'a dyn OutputProbe,
    input: R,
    output: W,
}

impl<'a, R: Read, W: Write> StdioAdapter<'a, R, W> {
    pub fn new(probe: &'a dyn OutputProbe, input: R, output: W) -> Self {
        Self {
            probe,
            input,
            output,
        }
    }

    pub fn serve_key_provider(mut self, provider: &dyn KeyProvider) -> Result<Exchange, PluginError> {
        self.open(PluginKind::KeyProvider)?;

        let request = self.read_request()?;
        let prior = KeyProviderRequest::parse(&request)?;
        let response = provider.provide_keys(prior.as_ref())?;
        let response_bytes = self.respond(&response)?;

        Ok(Exchange {
            request_bytes: request.len(),
            response_bytes,
            prior_metadata: Some(prior.is_some()),
        })
    }

    pub fn serve_method(
        mut self,
        method: &dyn Method,
        direction: Option<Direction>,
    ) -> Result<Exchange, PluginError> {
        self.open(PluginKind::EncryptionMethod)?;

        let request = self.read_request()?;
        let decoded = MethodRequest::parse(&request)?;

        if direction.is_none() && method.requires_direction() {
            return Err(PluginError::UnsupportedMode);
        }
        let payload = method.transform(direction, decoded.key.as_bytes(), &decoded.payload)?;
        let response_bytes = self.respond(&MethodResponse { payload })?;

        Ok(Exchange {
            request_bytes: request.len(),
            response_bytes,
            prior_metadata: None,
        })
    }

    /// Guard, then handshake; nothing reaches stdout if the guard refuses
    fn open(&mut self, kind: PluginKind) -> Result<(), PluginError> {
        ensure_piped(self.probe)?;
        Handshake::for_kind(kind).write_to(&mut self.output)
    }

    fn read_request(&mut self) -> Result<Vec<u8>, PluginError> {
        let mut buf = Vec::new();
        self.input.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Serializes fully before writing so a failure never leaves a partial
    /// document on stdout
    fn respond<T: Serialize>(&mut self, response: &T) -> Result<usize, PluginError> {
        let mut doc = serde_json::to_vec(response).map_err(std::io::Error::other)?;
        doc.push(b'\n');
        self.output.write_all(&doc)?;
        self.output.flush()?;
        Ok(doc.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::capability::{FreshKeys, RestoredKeys};
    use crate::plugin::guard::tests::FakeProbe;
    use crate::protocol::{host, KeyBytes, Metadata};

    struct Static;

    impl KeyProvider for Static {
        fn fresh_keys(&self) -> Result<FreshKeys, PluginError> {
            Ok(FreshKeys {
                encryption_key: KeyBytes::new(vec![7; 4]),
                meta: Metadata::empty(),
            })
        }

        fn restore_keys(&self, prior: &Metadata) -> Result<RestoredKeys, PluginError> {
            Ok(RestoredKeys {
                encryption_key: KeyBytes::new(vec![7; 4]),
                decryption_key: KeyBytes::new(vec![7; 4]),
                meta: prior.clone(),
            })
        }
    }

    struct Broken;

    impl KeyProvider for Broken {
        fn fresh_keys(&self) -> Result<FreshKeys, PluginError> {
            Err(PluginError::derivation("no entropy"))
        }

        fn restore_keys(&self, _prior: &Metadata) -> Result<RestoredKeys, PluginError> {
            Err(PluginError::derivation("corrupted metadata"))
        }
    }

    struct Reverse {
        strict: bool,
    }

    impl Method for Reverse {
        fn requires_direction(&self) -> bool {
            self.strict
        }

        fn transform(
            &self,
            _direction: Option<Direction>,
            _key: &[u8],
            payload: &[u8],
        ) -> Result<Vec<u8>, PluginError> {
            Ok(payload.iter().rev().copied().collect())
        }
    }

    fn header_line(kind: PluginKind) -> String {
        let mut out = Vec::new();
        Handshake::for_kind(kind).write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn interactive_run_writes_nothing() {
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(true), &b"null"[..], &mut out)
            .serve_key_provider(&Static)
            .unwrap_err();

        assert!(matches!(err, PluginError::InteractiveInvocation));
        assert!(out.is_empty());
    }

    /// Fails any read, so a run that touches stdin reports `Io` instead
    struct UnreadInput;

    impl Read for UnreadInput {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("stdin was read"))
        }
    }

    #[test]
    fn interactive_run_rejects_before_reading_stdin() {
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(true), UnreadInput, &mut out)
            .serve_key_provider(&Static)
            .unwrap_err();
        assert!(matches!(err, PluginError::InteractiveInvocation));

        let err = StdioAdapter::new(&FakeProbe(true), UnreadInput, &mut out)
            .serve_method(&Reverse { strict: false }, None)
            .unwrap_err();
        assert!(matches!(err, PluginError::InteractiveInvocation));
        assert!(out.is_empty());
    }

    #[test]
    fn interactive_run_ignores_malformed_input() {
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(true), &b"{oops"[..], &mut out)
            .serve_key_provider(&Static)
            .unwrap_err();

        assert!(matches!(err, PluginError::InteractiveInvocation));
        assert!(out.is_empty());
    }

    #[test]
    fn interactive_method_run_writes_nothing() {
        let mut out = Vec::new();
        let request = br#"{"key": "QUI=", "payload": "AQID"}"#;
        let err = StdioAdapter::new(&FakeProbe(true), &request[..], &mut out)
            .serve_method(&Reverse { strict: true }, Some(Direction::Encrypt))
            .unwrap_err();

        assert!(matches!(err, PluginError::InteractiveInvocation));
        assert!(out.is_empty());
    }

    #[test]
    fn handshake_comes_first() {
        let mut out = Vec::new();
        StdioAdapter::new(&FakeProbe(false), &b"null"[..], &mut out)
            .serve_key_provider(&Static)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&header_line(PluginKind::KeyProvider)));
    }

    #[test]
    fn fresh_request_omits_decryption_key() {
        let mut out = Vec::new();
        let exchange = StdioAdapter::new(&FakeProbe(false), &b"null"[..], &mut out)
            .serve_key_provider(&Static)
            .unwrap();

        assert_eq!(exchange.prior_metadata, Some(false));
        let response = host::read_key_provider_output(&out, false).unwrap();
        assert!(response.keys.decryption_key.is_none());
    }

    #[test]
    fn metadata_is_handed_to_provider() {
        let input = br#"{"external_data": {"salt": "abc"}}"#;
        let mut out = Vec::new();
        StdioAdapter::new(&FakeProbe(false), &input[..], &mut out)
            .serve_key_provider(&Static)
            .unwrap();

        let response = host::read_key_provider_output(&out, true).unwrap();
        assert!(response.keys.decryption_key.is_some());
        assert!(!response.meta.external_data.is_empty());
    }

    #[test]
    fn malformed_request_stops_after_handshake() {
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(false), &b"{oops"[..], &mut out)
            .serve_key_provider(&Static)
            .unwrap_err();

        assert!(matches!(err, PluginError::MalformedRequest(_)));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            header_line(PluginKind::KeyProvider)
        );
    }

    #[test]
    fn derivation_failure_writes_no_response() {
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(false), &br#"{"external_data":{}}"#[..], &mut out)
            .serve_key_provider(&Broken)
            .unwrap_err();

        assert!(matches!(err, PluginError::InternalDerivationFailure(_)));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            header_line(PluginKind::KeyProvider)
        );
    }

    #[test]
    fn method_transforms_payload() {
        let input = br#"{"key": "QUI=", "payload": "AQID"}"#;
        let mut out = Vec::new();
        StdioAdapter::new(&FakeProbe(false), &input[..], &mut out)
            .serve_method(&Reverse { strict: false }, None)
            .unwrap();

        let response = host::read_method_output(&out).unwrap();
        assert_eq!(response.payload, vec![3u8, 2, 1]);
    }

    #[test]
    fn strict_method_needs_direction() {
        let input = br#"{"key": "QUI=", "payload": "AQID"}"#;
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(false), &input[..], &mut out)
            .serve_method(&Reverse { strict: true }, None)
            .unwrap_err();
        assert!(matches!(err, PluginError::UnsupportedMode));

        let mut out = Vec::new();
        StdioAdapter::new(&FakeProbe(false), &input[..], &mut out)
            .serve_method(&Reverse { strict: true }, Some(Direction::Decrypt))
            .unwrap();
        assert!(host::read_method_output(&out).is_ok());
    }

    #[test]
    fn method_rejects_missing_payload() {
        let mut out = Vec::new();
        let err = StdioAdapter::new(&FakeProbe(false), &br#"{"key": "QUI="}"#[..], &mut out)
            .serve_method(&Reverse { strict: false }, None)
            .unwrap_err();

        assert!(matches!(err, PluginError::MalformedRequest(_)));
    }
}
