//! Manifest served to the frame host at `/.well-known/farcaster.json`

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::FrameConfig;
use crate::error::{Error, Result};

/// Header value sent with the manifest response
pub const CACHE_CONTROL: &str = "public, max-age=3600";

/// Manifest frame version
pub const MANIFEST_VERSION: &str = "next";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameManifest {
    pub account_association: AccountAssociation,
    pub frame: FrameDetails,
}

/// Domain ownership proof: base64url header, payload, and signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssociation {
    pub header: String,
    pub payload: String,
    pub signature: String,
}

/// Decoded account association header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssociationHeader {
    pub fid: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
}

/// Decoded account association payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssociationPayload {
    pub domain: String,
}

impl AccountAssociation {
    pub fn decode_header(&self) -> Result<AssociationHeader> {
        decode_segment(&self.header)
    }

    pub fn decode_payload(&self) -> Result<AssociationPayload> {
        decode_segment(&self.payload)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T> {
    // Some issuers pad, some do not
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| Error::Serialization(format!("Invalid base64url segment: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetails {
    pub version: String,
    pub name: String,
    pub icon_url: String,
    pub home_url: String,
    pub image_url: String,
    pub button_title: String,
    pub splash_image_url: String,
    pub splash_background_color: String,
    pub webhook_url: String,
}

/// Base URL without a trailing slash
pub(crate) fn base_url(config: &FrameConfig) -> &str {
    config.base_url.trim_end_matches('/')
}

impl FrameManifest {
    pub fn from_config(config: &FrameConfig) -> Self {
        let base = base_url(config);
        let association = &config.account_association;

        Self {
            account_association: AccountAssociation {
                header: association.header.clone(),
                payload: association.payload.clone(),
                signature: association.signature.clone(),
            },
            frame: FrameDetails {
                version: MANIFEST_VERSION.to_string(),
                name: config.app_name.clone(),
                icon_url: format!("{}/icon.png", base),
                home_url: format!("{}/", base),
                image_url: format!("{}/api/og", base),
                button_title: config.button_title.clone(),
                splash_image_url: format!("{}/splash.png", base),
                splash_background_color: config.splash_background_color.clone(),
                webhook_url: format!("{}/api/webhook", base),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
