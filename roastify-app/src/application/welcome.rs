use rand::seq::SliceRandom;

const WELCOME_LINES: &[&str] = &[
    "স্বাগতম {name}! আশা করি এখানে ভালো সময় কাটাবেন! 😊",
    "{name} এসেছেন! এবার গ্রুপে রোস্টিং শুরু হবে! 😈",
    "স্বাগতম {name}! রোস্টের জন্য প্রস্তুত থাকুন! 💀",
    "হ্যালো {name}! আমি রোস্টিফাই, তোমার অপেক্ষায় ছিলাম! 😏",
    "Welcome {name}! Hope you have a great time here! 😊",
    "{name} has joined! Brace yourself for some roasts! 🔥",
];

const WELCOME_FOOTER: &str = "Try /roast <text>, or reply to a friend with /roast.";

/// Greeting for someone who just joined a group.
pub fn welcome_message(name: &str) -> String {
    let line = WELCOME_LINES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Welcome {name}!");
    format!("{}\n{}", line.replace("{name}", name), WELCOME_FOOTER)
}
