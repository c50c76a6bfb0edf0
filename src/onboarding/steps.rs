//! Onboarding carousel content

/// One page of the onboarding carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingStep {
    pub emoji: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub details: &'static str,
}

/// Number of steps before completion
pub const STEP_COUNT: usize = 4;

/// The fixed four-step carousel
pub static STEPS: [OnboardingStep; STEP_COUNT] = [
    OnboardingStep {
        emoji: "✨",
        title: "Welcome to Karma Tipper",
        description: "Support creators with crypto tips on Base network",
        details: "Send $DEGEN tokens to show appreciation for great content",
    },
    OnboardingStep {
        emoji: "👛",
        title: "Connect Your Wallet",
        description: "Use any Web3 wallet to get started",
        details: "Any wallet with an EIP-1193 RPC endpoint works",
    },
    OnboardingStep {
        emoji: "💸",
        title: "Send Tips Instantly",
        description: "Choose an amount and recipient",
        details: "Tips are sent directly on Base - fast and low cost",
    },
    OnboardingStep {
        emoji: "🎯",
        title: "Ready to Start!",
        description: "Explore the app now",
        details: "You can connect your wallet anytime to send tips",
    },
];
