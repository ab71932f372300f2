//! Rule-based chat reply engine.
//!
//! [`reply`] is a pure, total function from `(role, message)` to reply
//! text: every input yields exactly one reply, falling back to a per-role
//! help message (or the global "select a role" message when no role is
//! set). Rules are keyword groups evaluated in declared order; the first
//! matching rule wins.
//!
//! Templates are static strings that may carry `**bold**` emphasis markers.
//! The chat surface renders them with [`crate::transcript::render_emphasis`];
//! the engine itself never interpolates dynamic content into a template.

use crate::intent::Role;

/// A single reply rule: keyword group plus the template it produces.
struct ReplyRule {
    keywords: &'static [&'static str],
    template: &'static str,
}

/// Reply returned when no role has been selected yet.
pub const NO_ROLE_REPLY: &str =
    "Please select your role (Farmer, Seller, or Buyer) first.";

const FARMER_WELCOME: &str = "Hi! You're in **Farmer** mode. I can help with: crop prediction (soil, season, water), fertilizer recommendations, plant disease detection, and step-by-step cultivation guidance. Ask me anything—e.g. 'best crop for black soil', 'fertilizer for wheat', or 'how to grow rice'.";

const SELLER_WELCOME: &str = "Hi! You're in **Seller** mode. I can help with: listing your crops and quantity, setting prices, and seeing buyer interest. Ask me how to add crops, set prices, or check notifications.";

const BUYER_WELCOME: &str = "Hi! You're in **Buyer** mode. I can help with: finding sellers by crop, location, and budget, and tracking delivery. Ask me how to find crops, match with sellers, or track your order.";

const FARMER_RULES: &[ReplyRule] = &[
    ReplyRule {
        keywords: &["crop", "soil", "season", "water", "predict", "recommend", "best crop"],
        template: "Use the **Crop Prediction** section: choose soil color, previous crop, season, and water availability, then click 'Predict Best Crop'. I'll recommend suitable crops based on your inputs.",
    },
    ReplyRule {
        keywords: &["fertilizer", "fertilisers", "urea", "dap", "npk"],
        template: "Use **Fertilizer Recommendation**: enter your crop name (and optional disease). You'll get base and corrective fertilizer suggestions for better yield.",
    },
    ReplyRule {
        keywords: &["disease", "leaf spot", "blight", "sick", "plant health"],
        template: "Use **Disease Detection**: upload a clear photo of the affected leaf or plant. Our AI will suggest a possible diagnosis and remedy. For accurate results, use a well-lit, close-up image.",
    },
    ReplyRule {
        keywords: &["cultivation", "grow", "sowing", "harvest", "procedure", "steps"],
        template: "Use **Cultivation Guide** or **Complete procedure planning**: type the crop name (e.g. rice, wheat) and get step-by-step guidance from land preparation to post-harvest storage.",
    },
    ReplyRule {
        keywords: &["hello", "hi", "help"],
        template: FARMER_WELCOME,
    },
];

const FARMER_FALLBACK: &str = "As a farmer, I can help with crop prediction, fertilizers, disease detection, and cultivation steps. Use the cards above, or ask: 'best crop for my soil', 'fertilizer for wheat', or 'how to grow rice'.";

const SELLER_RULES: &[ReplyRule] = &[
    ReplyRule {
        keywords: &["list", "add crop", "quantity", "price", "profile"],
        template: "Go to **Seller profile & crop quantity**: enter your name, location (lat/lon), then add each crop with name, quantity, unit price, and quality (1–10). Click 'Save profile' to register.",
    },
    ReplyRule {
        keywords: &["buyer", "interest", "notification", "order"],
        template: "Check **Buyer interest & notifications**: click 'Refresh' to see buyers interested in your crops. You can respond to them from the list or popup.",
    },
    ReplyRule {
        keywords: &["hello", "hi", "help"],
        template: SELLER_WELCOME,
    },
];

const SELLER_FALLBACK: &str = "As a seller, I can help you list crops, set prices, and see buyer interest. Ask: 'how to add crops', 'how to set price', or 'check notifications'.";

const BUYER_RULES: &[ReplyRule] = &[
    ReplyRule {
        keywords: &["find", "match", "seller", "crop", "budget", "buy"],
        template: "Use **Buyer-Seller Match**: enter the crop you want, max budget (₹), and your location (lat, lon). Click 'Find matches' to see nearby sellers with that crop, price, and quality score.",
    },
    ReplyRule {
        keywords: &["delivery", "track", "tracking", "order status"],
        template: "Use **Delivery Tracking**: enter your tracking ID (e.g. DEMO001) and click 'Track'. You can also create a new delivery with origin and destination to get a tracking ID.",
    },
    ReplyRule {
        keywords: &["hello", "hi", "help"],
        template: BUYER_WELCOME,
    },
];

const BUYER_FALLBACK: &str = "As a buyer, I can help you find sellers and track delivery. Ask: 'how to find wheat', 'match by budget', or 'track my order'.";

/// Fixed welcome message appended once when a role's chat panel opens.
///
/// Seeding the panel is the caller's job; [`reply`] never emits this
/// unprompted (only via the greeting rule).
pub fn welcome_message(role: Role) -> &'static str {
    match role {
        Role::Farmer => FARMER_WELCOME,
        Role::Seller => SELLER_WELCOME,
        Role::Buyer => BUYER_WELCOME,
    }
}

fn rules_for(role: Role) -> (&'static [ReplyRule], &'static str) {
    match role {
        Role::Farmer => (FARMER_RULES, FARMER_FALLBACK),
        Role::Seller => (SELLER_RULES, SELLER_FALLBACK),
        Role::Buyer => (BUYER_RULES, BUYER_FALLBACK),
    }
}

/// Produce the bot reply for a chat message.
///
/// Deterministic and total: always returns a non-empty string, never
/// panics. With no role selected the content of `message` is ignored.
pub fn reply(role: Option<Role>, message: &str) -> String {
    let Some(role) = role else {
        return NO_ROLE_REPLY.to_owned();
    };

    let normalized = message.trim().to_lowercase();
    let (rules, fallback) = rules_for(role);
    for rule in rules {
        if rule.keywords.iter().any(|k| normalized.contains(k)) {
            return rule.template.to_owned();
        }
    }
    fallback.to_owned()
}
