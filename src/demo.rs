// Demo mode: a built-in message archive to showcase the explorer
//
// The archive is generated from a fixed seed, so every run (and every
// test) sees exactly the same messages. It is shaped to make the linked
// views interesting:
// - one owner present in every thread (inferred as the user)
// - group chats and one-to-one threads of very different sizes
// - evening-heavy daily rhythm with quiet nights
// - a busy stretch around the end of the year
// - a mix of short replies, long messages and media
//
// Run with: msgscope --demo

use crate::model::{Media, RawMessage};
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Owner of the demo export
pub const DEMO_OWNER: &str = "Alex Martin";

const SEED: u64 = 0x5eed_cafe_f00d_d00d;

/// 2022-01-03 00:00:00 UTC (a Monday)
const START: i64 = 1_641_168_000;
const DAYS: i64 = 540;

struct DemoThread {
    name: &'static str,
    members: &'static [&'static str],
    /// Relative share of all messages
    weight: u32,
}

const THREADS: &[DemoThread] = &[
    DemoThread {
        name: "Sam Okafor",
        members: &["Sam Okafor"],
        weight: 30,
    },
    DemoThread {
        name: "Family",
        members: &["Maria Martin", "Jorge Martin", "Lucia Martin"],
        weight: 22,
    },
    DemoThread {
        name: "Climbing Crew",
        members: &["Priya Nair", "Tom Becker", "Sam Okafor", "Yuki Tanaka", "Ines Costa"],
        weight: 14,
    },
    DemoThread {
        name: "Priya Nair",
        members: &["Priya Nair"],
        weight: 10,
    },
    DemoThread {
        name: "Flat 4B",
        members: &["Tom Becker", "Noor Haddad"],
        weight: 8,
    },
    DemoThread {
        name: "Book & Wine Club",
        members: &[
            "Ines Costa",
            "Noor Haddad",
            "Chloé Dubois",
            "Mateo Ruiz",
            "Hana Kim",
            "Oliver Grant",
            "Zara Ahmed",
            "Luca Bianchi",
            "Emma Novak",
        ],
        weight: 6,
    },
    DemoThread {
        name: "Yuki Tanaka",
        members: &["Yuki Tanaka"],
        weight: 4,
    },
    DemoThread {
        name: "Chloé Dubois",
        members: &["Chloé Dubois"],
        weight: 3,
    },
    DemoThread {
        name: "Marketplace: bike",
        members: &["Daniel Price"],
        weight: 1,
    },
];

/// Relative activity per hour of day (local to the export owner)
const HOURLY: [u32; 24] = [
    3, 1, 1, 0, 0, 0, 1, 4, 8, 9, 8, 9, 12, 11, 8, 8, 9, 11, 14, 18, 20, 19, 14, 8,
];

const SHORT: &[&str] = &[
    "ok",
    "haha",
    "yes!",
    "on my way",
    "sounds good",
    "see you there",
    "thanks :)",
    "lol",
    "what time?",
    "sure",
    "nope",
    "omw",
];

const MEDIUM: &[&str] = &[
    "Are we still on for Saturday?",
    "Just got home, the traffic was unreal tonight.",
    "Did you see the photos from the weekend?",
    "I'll bring snacks, someone else handle drinks",
    "Can you send me the address again?",
    "That gym session destroyed my forearms",
    "Happy birthday!! Hope it's a great one 🎉",
    "Running 10 minutes late, sorry",
    "Who's cooking this week?",
    "Finished the book last night, the ending though...",
];

const LONG: &[&str] = &[
    "Okay so long story short: the train got cancelled, I ended up sharing a taxi with two strangers who turned out to be going to the same wedding, and now we have a group chat. Life is weird.",
    "Quick recap for everyone who missed it: we're meeting at the usual place at 7, bring your own gear if you have it, and Tom has spare harnesses for anyone who needs one. Let me know by Thursday so I can book.",
    "I've been thinking about what you said and honestly I agree. It's a big change but it's probably the right time, and the worst case is that we learn something. Let's talk properly this weekend?",
];

/// Number of messages in the demo archive
pub const DEMO_SIZE: usize = 2400;

/// The demo archive, in timestamp order
pub fn demo_messages() -> Vec<RawMessage> {
    match generate(&mut ChaCha8Rng::seed_from_u64(SEED)) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::error!("Demo archive weights are invalid: {}", e);
            Vec::new()
        }
    }
}

fn generate(rng: &mut ChaCha8Rng) -> Result<Vec<RawMessage>, WeightedError> {
    let threads = WeightedIndex::new(THREADS.iter().map(|t| t.weight))?;
    let hours = WeightedIndex::new(HOURLY)?;
    let mut messages = Vec::with_capacity(DEMO_SIZE);

    for _ in 0..DEMO_SIZE {
        let thread = &THREADS[threads.sample(rng)];

        // Denser around the holidays (days 330..380 of the window)
        let day = if rng.gen_bool(0.20) {
            rng.gen_range(330..380)
        } else {
            rng.gen_range(0..DAYS)
        };
        let hour = hours.sample(rng) as i64;
        let secs = rng.gen_range(0..3600);
        let timestamp = (START + day * 86_400 + hour * 3600 + secs) as f64;

        // The owner writes a bit under half of every thread
        let sender = match thread.members.choose(rng) {
            Some(member) if !rng.gen_bool(0.45) => *member,
            _ => DEMO_OWNER,
        };

        let (media, text) = if rng.gen_bool(0.08) {
            (Media::Media, "[Media file]")
        } else if rng.gen_bool(0.02) {
            (Media::Media, "[Sticker]")
        } else {
            let pool = match rng.gen_range(0..100) {
                0..=44 => SHORT,
                45..=92 => MEDIUM,
                _ => LONG,
            };
            (Media::None, pool.choose(rng).copied().unwrap_or("ok"))
        };

        messages.push(RawMessage::new(
            sender,
            timestamp,
            thread.name,
            thread.members.len() as u32 + 1,
            media,
            text,
        ));
    }

    messages.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    Ok(messages)
}
