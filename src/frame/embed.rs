//! Embed metadata for link previews inside the frame host

use serde::{Deserialize, Serialize};

use super::manifest::base_url;
use crate::config::FrameConfig;
use crate::error::Result;

/// Embed document version
pub const EMBED_VERSION: &str = "1";

/// Meta tag names carrying the embed documents
pub const MINIAPP_META_NAME: &str = "fc:miniapp";
pub const FRAME_META_NAME: &str = "fc:frame";

/// How the host should open the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchAction {
    LaunchMiniapp,
    LaunchFrame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embed {
    pub version: String,
    pub image_url: String,
    pub button: EmbedButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedButton {
    pub title: String,
    pub action: EmbedAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAction {
    #[serde(rename = "type")]
    pub kind: LaunchAction,
    pub name: String,
    pub url: String,
}

impl Embed {
    pub fn new(config: &FrameConfig, kind: LaunchAction) -> Self {
        let base = base_url(config);
        Self {
            version: EMBED_VERSION.to_string(),
            image_url: format!("{}/splash.png", base),
            button: EmbedButton {
                title: config.button_title.clone(),
                action: EmbedAction {
                    kind,
                    name: config.app_name.clone(),
                    url: base.to_string(),
                },
            },
        }
    }
}

/// Both embed flavours, keyed by meta tag name
pub fn embed_meta_tags(config: &FrameConfig) -> Result<Vec<(&'static str, String)>> {
    let miniapp = Embed::new(config, LaunchAction::LaunchMiniapp);
    let frame = Embed::new(config, LaunchAction::LaunchFrame);
    Ok(vec![
        (MINIAPP_META_NAME, serde_json::to_string(&miniapp)?),
        (FRAME_META_NAME, serde_json::to_string(&frame)?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_types() {
        let config = FrameConfig::default();
        let miniapp = serde_json::to_value(Embed::new(&config, LaunchAction::LaunchMiniapp)).unwrap();
        let frame = serde_json::to_value(Embed::new(&config, LaunchAction::LaunchFrame)).unwrap();

        assert_eq!(miniapp["button"]["action"]["type"], "launch_miniapp");
        assert_eq!(frame["button"]["action"]["type"], "launch_frame");
        assert_eq!(frame["version"], "1");
        assert_eq!(frame["imageUrl"], "https://karma-tipper.vercel.app/splash.png");
        assert_eq!(frame["button"]["title"], "Open Karma Tipper");
        assert_eq!(frame["button"]["action"]["name"], "Karma Tipper");
        assert_eq!(frame["button"]["action"]["url"], "https://karma-tipper.vercel.app");
    }

    #[test]
    fn test_meta_tags() {
        let tags = embed_meta_tags(&FrameConfig::default()).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].0, "fc:miniapp");
        assert_eq!(tags[1].0, "fc:frame");

        let parsed: Embed = serde_json::from_str(&tags[1].1).unwrap();
        assert_eq!(parsed.button.action.kind, LaunchAction::LaunchFrame);
    }
}
