use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use teloxide::prelude::*;

/// How long the post-quiz celebration keeps going, and how often it bursts.
pub const SUSTAINED_DURATION_MS: u64 = 8_000;
pub const SUSTAINED_INTERVAL_MS: u64 = 2_000;
/// Delay before the star overlay shows up on the celebration card.
pub const STAR_OVERLAY_DELAY_MS: u64 = 1_000;

/// Fire-and-forget visuals around the quiz. Nothing in the engine waits on
/// these or observes their completion.
pub trait CelebrationEffects {
    /// A timed, self-terminating sequence of confetti bursts.
    fn trigger_sustained_celebration(&self);
    /// A single short burst.
    fn trigger_burst(&self);
    /// A cosmetic overlay, shown after the given delay.
    fn show_delayed_overlay(&self, after_ms: u64);
}

/// No visuals at all. The engine has to work correctly with this one.
pub struct NoopEffects;
impl CelebrationEffects for NoopEffects {
    fn trigger_sustained_celebration(&self) {}
    fn trigger_burst(&self) {}
    fn show_delayed_overlay(&self, _after_ms: u64) {}
}

const CONFETTI_EMOJI: [&str; 7] = ["🎉", "🎊", "✨", "🎈", "💖", "🎂", "🎁"];

fn confetti_row() -> String {
    let mut rng = rand::thread_rng();
    (0..rng.gen_range(5..9))
        .map(|_| *CONFETTI_EMOJI.choose(&mut rng).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

fn star_field() -> String {
    let mut rng = rand::thread_rng();
    (0..3)
        .map(|_| format!("{}⭐ 🌟 ⭐", "  ".repeat(rng.gen_range(0..4))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the celebration as chat messages: repeated confetti rows for the
/// sustained sequence, one row for a burst, and a star field for the overlay.
pub struct TelegramEffects {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramEffects {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

impl CelebrationEffects for TelegramEffects {
    fn trigger_sustained_celebration(&self) {
        let bot = self.bot.clone();
        let chat_id = self.chat_id;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(SUSTAINED_INTERVAL_MS));
            let rounds = SUSTAINED_DURATION_MS / SUSTAINED_INTERVAL_MS;
            for _ in 0..rounds {
                interval.tick().await;
                // Purely cosmetic; if Telegram rejects a message we just stop.
                if let Err(err) = bot.send_message(chat_id, confetti_row()).await {
                    log::warn!("confetti message failed: {}", err);
                    return;
                }
            }
        });
    }

    fn trigger_burst(&self) {
        let bot = self.bot.clone();
        let chat_id = self.chat_id;
        tokio::spawn(async move {
            if let Err(err) = bot.send_message(chat_id, confetti_row()).await {
                log::warn!("burst message failed: {}", err);
            }
        });
    }

    fn show_delayed_overlay(&self, after_ms: u64) {
        let bot = self.bot.clone();
        let chat_id = self.chat_id;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(after_ms)).await;
            if let Err(err) = bot.send_message(chat_id, star_field()).await {
                log::warn!("star overlay message failed: {}", err);
            }
        });
    }
}
