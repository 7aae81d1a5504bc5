//! Bot detection gate for click recording.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::entities::InboundRequest;

static BOT_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)bot|chatgpt|facebookexternalhit|WhatsApp|google|baidu|bing|msn|duckduckbot|teoma|slurp|yandex|MetaInspector",
    )
    .expect("bot user-agent pattern is valid")
});

/// Decides whether a request comes from an automated client.
///
/// Implementations must be side-effect free.
pub trait BotFilter: Send + Sync {
    fn is_bot(&self, request: &InboundRequest) -> bool;
}

/// Flags crawlers, link unfurlers and explicit `?bot=` test traffic.
#[derive(Debug, Clone, Default)]
pub struct UserAgentBotFilter;

impl UserAgentBotFilter {
    pub fn new() -> Self {
        Self
    }
}

impl BotFilter for UserAgentBotFilter {
    fn is_bot(&self, request: &InboundRequest) -> bool {
        if request
            .query_param("bot")
            .is_some_and(|v| !v.is_empty())
        {
            return true;
        }

        request.user_agent().is_some_and(|ua| BOT_UA.is_match(ua))
    }
}
