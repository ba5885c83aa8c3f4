use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::options::keys;
use crate::domain::{DescriptorBuilder, OptionSet, SectionId};

use super::validators::client_cert_pair;

pub(super) const FIELD_TLS_ENABLED: &str = "tls_enabled";
pub(super) const FIELD_TLS_INSECURE: &str = "tls_insecure";
pub(super) const FIELD_TLS_CA: &str = "tls_ca";
pub(super) const FIELD_TLS_USER_CERT: &str = "tls_user_cert";
pub(super) const FIELD_TLS_USER_KEY: &str = "tls_user_key";

/// Insecure flag for request/tcp: sent only when set, and then the CA is not.
pub(super) fn append_insecure_flag(
    builder: &mut DescriptorBuilder,
    options: &OptionSet,
    sections: &BTreeSet<SectionId>,
) {
    if sections.contains(&SectionId::TlsInsecure) && options.flag(keys::TLS_INSECURE) {
        builder.text(FIELD_TLS_INSECURE, "true");
    }
}

/// CA attachment and client certificate pair, as allowed by `sections`.
pub(super) fn append_ca_and_client_cert(
    builder: &mut DescriptorBuilder,
    options: &OptionSet,
    sections: &BTreeSet<SectionId>,
) {
    if sections.contains(&SectionId::TlsCa) {
        if let Some(ca) = options.file(keys::TLS_CA) {
            builder.file(FIELD_TLS_CA, ca.clone());
        }
    } else if options.is_supplied(keys::TLS_CA) {
        warn!("CA file ignored: not used with the current TLS settings");
    }

    let cert = options.file(keys::TLS_CERT);
    let key = options.file(keys::TLS_KEY);
    if !sections.contains(&SectionId::TlsClientCert) {
        if cert.is_some() || key.is_some() {
            warn!("Client certificate ignored: not supported with the current TLS settings");
        }
        return;
    }
    match client_cert_pair(cert, key) {
        Some((cert, key)) => {
            builder.file(FIELD_TLS_USER_CERT, cert.clone());
            builder.file(FIELD_TLS_USER_KEY, key.clone());
        }
        None if cert.is_some() || key.is_some() => {
            warn!("Client certificate and key are only sent together; neither is attached");
        }
        None => {}
    }
}
