mod effects;
mod quiz;

use dotenv::dotenv;
use effects::TelegramEffects;
use quiz::{QuizEngine, Stage};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove},
};

type CardDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum State {
    #[default]
    Start,
    InQuiz {
        engine: QuizEngine,
    },
    AtResult {
        engine: QuizEngine,
    },
    AtCelebration {
        engine: QuizEngine,
    },
    ReceiveGreeting {
        engine: QuizEngine,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting birthday celebration bot...");

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::InQuiz { engine }].endpoint(in_quiz))
            .branch(dptree::case![State::AtResult { engine }].endpoint(at_result))
            .branch(dptree::case![State::AtCelebration { engine }].endpoint(at_celebration))
            .branch(dptree::case![State::ReceiveGreeting { engine }].endpoint(receive_greeting)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new()])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str =
    "Hey! This is willow's birthday quiz. Get all five questions right to unlock the celebration!";
const SEE_CARD: &str = "See your card 🎂";
const TRY_AGAIN: &str = "Try again";
const CUSTOMIZE_GREETING: &str = "Customize the greeting";
const BACK_TO_QUIZ: &str = "Back to the quiz";

fn option_keyboard(engine: &QuizEngine) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![engine
        .current_question()
        .options
        .iter()
        .map(|option| KeyboardButton::new(option.label.clone()))
        .collect::<Vec<_>>()])
}

fn card_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(CUSTOMIZE_GREETING),
        KeyboardButton::new(BACK_TO_QUIZ),
    ]])
}

async fn send_question(bot: &Bot, chat_id: ChatId, engine: &QuizEngine) -> HandlerResult {
    let filled = engine.question_number();
    let progress: String = (1..=engine.total_questions())
        .map(|n| if n <= filled { '▰' } else { '▱' })
        .collect();

    let text = format!(
        "Question {}/{}  {}\n\n{}",
        engine.question_number(),
        engine.total_questions(),
        progress,
        engine.current_question().text
    );
    bot.send_message(chat_id, text)
        .reply_markup(option_keyboard(engine))
        .await?;
    Ok(())
}

async fn send_card(bot: &Bot, chat_id: ChatId, engine: &QuizEngine) -> HandlerResult {
    let card = format!(
        "🐧\n\n{}\nToday is your special day!\n\nHope this year is your best one yet.\nHave a wonderful birthday, and keep smiling!",
        engine.display_name()
    );
    bot.send_message(chat_id, card)
        .reply_markup(card_keyboard())
        .await?;
    Ok(())
}

async fn start(bot: Bot, dialogue: CardDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    let engine = QuizEngine::birthday();
    send_question(&bot, msg.chat.id, &engine).await?;

    dialogue.update(State::InQuiz { engine }).await?;
    Ok(())
}

async fn in_quiz(
    bot: Bot,
    dialogue: CardDialogue,
    mut engine: QuizEngine,
    msg: Message,
) -> HandlerResult {
    let selected = msg.text().and_then(|text| {
        engine
            .current_question()
            .options
            .iter()
            .find(|option| option.label == text)
            .map(|option| option.value.clone())
    });

    let Some(value) = selected else {
        bot.send_message(msg.chat.id, "Please pick one of the answers on the keyboard")
            .reply_markup(option_keyboard(&engine))
            .await?;
        return Ok(());
    };

    engine.select_option(&value);
    let effects = TelegramEffects::new(bot.clone(), msg.chat.id);
    engine.confirm_answer(&effects);

    if engine.stage() == Stage::Result {
        if engine.passed() == Some(true) {
            log::debug!("chat {} passed the quiz", msg.chat.id);
            let keyboard = KeyboardMarkup::new(vec![vec![KeyboardButton::new(SEE_CARD)]]);
            bot.send_message(msg.chat.id, "✅ You got every question right!")
                .reply_markup(keyboard)
                .await?;
        } else {
            let keyboard = KeyboardMarkup::new(vec![vec![KeyboardButton::new(TRY_AGAIN)]]);
            bot.send_message(msg.chat.id, "❌ Not quite! Want another go?")
                .reply_markup(keyboard)
                .await?;
        }
        dialogue.update(State::AtResult { engine }).await?;
        return Ok(());
    }

    send_question(&bot, msg.chat.id, &engine).await?;
    dialogue.update(State::InQuiz { engine }).await?;
    Ok(())
}

async fn at_result(
    bot: Bot,
    dialogue: CardDialogue,
    mut engine: QuizEngine,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(SEE_CARD) if engine.passed() == Some(true) => {
            let effects = TelegramEffects::new(bot.clone(), msg.chat.id);
            engine.confirm_celebration(&effects);
            send_card(&bot, msg.chat.id, &engine).await?;
            dialogue.update(State::AtCelebration { engine }).await?;
        }
        Some(TRY_AGAIN) if engine.passed() == Some(false) => {
            engine.reset();
            send_question(&bot, msg.chat.id, &engine).await?;
            dialogue.update(State::InQuiz { engine }).await?;
        }
        _ => {
            let label = if engine.passed() == Some(true) {
                SEE_CARD
            } else {
                TRY_AGAIN
            };
            bot.send_message(msg.chat.id, "Please use the button below")
                .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(label)]]))
                .await?;
        }
    }
    Ok(())
}

async fn at_celebration(
    bot: Bot,
    dialogue: CardDialogue,
    mut engine: QuizEngine,
    msg: Message,
) -> HandlerResult {
    match msg.text() {
        Some(CUSTOMIZE_GREETING) => {
            bot.send_message(
                msg.chat.id,
                "Send the new greeting line (e.g. \"Happy birthday, Alex!\")",
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
            dialogue.update(State::ReceiveGreeting { engine }).await?;
        }
        Some(BACK_TO_QUIZ) => {
            engine.reset();
            send_question(&bot, msg.chat.id, &engine).await?;
            dialogue.update(State::InQuiz { engine }).await?;
        }
        _ => {
            bot.send_message(msg.chat.id, "Please use one of the buttons below")
                .reply_markup(card_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn receive_greeting(
    bot: Bot,
    dialogue: CardDialogue,
    mut engine: QuizEngine,
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text().filter(|text| !text.trim().is_empty()) else {
        bot.send_message(msg.chat.id, "The greeting can't be blank, send some text")
            .await?;
        return Ok(());
    };

    let effects = TelegramEffects::new(bot.clone(), msg.chat.id);
    engine.set_display_name(text, &effects);

    send_card(&bot, msg.chat.id, &engine).await?;
    dialogue.update(State::AtCelebration { engine }).await?;
    Ok(())
}
