//! Browser front-end: builds the DOM once, wires click handlers and browser
//! timers to the [`Game`], and re-renders after every event.
//!
//! All state lives in a thread-local `App`; timer and click closures only ever
//! reach it through [`with_app`], one event at a time.

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlButtonElement, HtmlElement, Window, window};

use crate::config::GameConfig;
use crate::game::Game;
use crate::problem::OPTION_COUNT;
use crate::session::{Feedback, Phase};
use crate::store::{KeyValueStore, LocalStorage, MemoryStore};
use crate::timers::{Signal, Timers};

type WebGame = Game<Box<dyn KeyValueStore>, WebTimers, StdRng>;

// --- Browser timers -----------------------------------------------------------

/// Browsers take a signed 32-bit delay and fire negative ones at once, so
/// larger values saturate instead of wrapping.
fn browser_delay(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// `setInterval` / `setTimeout` backed timers. One long-lived closure per
/// signal; the browser handle ids are what the game keeps and cancels.
pub struct WebTimers {
    window: Window,
    callbacks: Vec<(Signal, Closure<dyn FnMut()>)>,
}

#[derive(Clone, Copy, Debug)]
pub enum WebTimer {
    Interval(i32),
    Timeout(i32),
}

impl WebTimers {
    fn new(window: Window) -> Self {
        let callbacks = [Signal::Tick, Signal::Advance, Signal::DismissOverlay]
            .into_iter()
            .map(|signal| {
                let closure = Closure::wrap(Box::new(move || {
                    with_app(|app| {
                        app.game.fire(signal);
                    });
                }) as Box<dyn FnMut()>);
                (signal, closure)
            })
            .collect();
        Self { window, callbacks }
    }

    fn callback(&self, signal: Signal) -> Option<&Closure<dyn FnMut()>> {
        self.callbacks
            .iter()
            .find(|(s, _)| *s == signal)
            .map(|(_, c)| c)
    }
}

impl Timers for WebTimers {
    type Handle = WebTimer;

    fn every(&mut self, period_ms: u32, signal: Signal) -> Option<WebTimer> {
        let callback = self.callback(signal)?;
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                browser_delay(period_ms),
            )
        {
            Ok(id) => Some(WebTimer::Interval(id)),
            Err(e) => {
                log::error!("setInterval failed for {signal:?}: {e:?}");
                None
            }
        }
    }

    fn once(&mut self, delay_ms: u32, signal: Signal) -> Option<WebTimer> {
        let callback = self.callback(signal)?;
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                browser_delay(delay_ms),
            )
        {
            Ok(id) => Some(WebTimer::Timeout(id)),
            Err(e) => {
                log::error!("setTimeout failed for {signal:?}: {e:?}");
                None
            }
        }
    }

    fn cancel(&mut self, handle: WebTimer) {
        match handle {
            WebTimer::Interval(id) => self.window.clear_interval_with_handle(id),
            WebTimer::Timeout(id) => self.window.clear_timeout_with_handle(id),
        }
    }
}

// --- DOM ----------------------------------------------------------------------

const APP_STYLE: &str = "min-height:100vh; margin:0; display:flex; align-items:center; justify-content:center; background:linear-gradient(160deg,#1e1b4b,#312e81); color:#fff; font-family:'Nunito', sans-serif;";
const CARD_STYLE: &str = "background:rgba(255,255,255,0.08); border:1px solid rgba(255,255,255,0.15); border-radius:24px; padding:32px; text-align:center; max-width:420px; width:100%;";
const BADGE_STYLE: &str = "padding:8px 16px; border-radius:16px; background:rgba(255,255,255,0.08); font-size:24px; font-weight:bold;";
const OPTION_STYLE: &str = "padding:20px; font-size:30px; font-weight:bold; color:#fff; border-radius:16px; border:1px solid rgba(255,255,255,0.2); background:rgba(255,255,255,0.08); cursor:pointer;";

struct Ui {
    start_screen: HtmlElement,
    play_screen: HtmlElement,
    high_score: HtmlElement,
    score: HtmlElement,
    bonus: HtmlElement,
    timer_fill: HtmlElement,
    question: HtmlElement,
    options: Vec<HtmlButtonElement>,
    overlay: HtmlElement,
}

struct App {
    game: WebGame,
    ui: Ui,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted app and re-render. Silently does nothing before
/// mount.
fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
            render(app);
        }
    });
}

fn element(doc: &Document, tag: &str, id: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element(tag)?.dyn_into()?;
    if !id.is_empty() {
        el.set_id(id);
    }
    el.set_attribute("style", style)?;
    Ok(el)
}

fn text(doc: &Document, tag: &str, style: &str, content: &str) -> Result<HtmlElement, JsValue> {
    let el = element(doc, tag, "", style)?;
    el.set_text_content(Some(content));
    Ok(el)
}

fn on_click(target: &HtmlElement, action: impl Fn(&mut WebGame) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        with_app(|app| action(&mut app.game));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn build_ui(doc: &Document) -> Result<Ui, JsValue> {
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let root = match doc.get_element_by_id("siven-app") {
        Some(el) => el.dyn_into::<HtmlElement>()?,
        None => {
            let el = element(doc, "main", "siven-app", APP_STYLE)?;
            body.append_child(&el)?;
            el
        }
    };

    // Start screen
    let start_screen = element(doc, "div", "siven-start", CARD_STYLE)?;
    let title = text(
        doc,
        "h1",
        "font-size:64px; margin:0 0 8px; color:#ec4899; font-weight:900; letter-spacing:-2px;",
        "SIVEN",
    )?;
    title.set_id("siven-title");
    start_screen.append_child(&title)?;
    let high_score = text(doc, "div", "margin-bottom:24px; color:#facc15; font-weight:bold;", "")?;
    high_score.set_id("siven-high-score");
    start_screen.append_child(&high_score)?;
    let intro = text(
        doc,
        "p",
        "font-size:20px; margin-bottom:32px; color:#c7d2fe;",
        "Rychlá matematika pro bystré hlavy. Dokážeš vyřešit všechny příklady?",
    )?;
    start_screen.append_child(&intro)?;
    let play_button = text(
        doc,
        "button",
        "width:100%; padding:16px; font-size:24px; font-weight:bold; color:#fff; border:none; border-radius:16px; background:linear-gradient(90deg,#ec4899,#a855f7); cursor:pointer; margin-bottom:32px;",
        "HRÁT!",
    )?;
    play_button.set_id("siven-play");
    start_screen.append_child(&play_button)?;
    let storage_notice = text(
        doc,
        "p",
        "font-size:13px; color:rgba(129,140,248,0.6);",
        "Tato hra používá prohlížeč k uložení vašeho nejlepšího skóre. Žádná data se neodesílají na server.",
    )?;
    start_screen.append_child(&storage_notice)?;
    root.append_child(&start_screen)?;

    // Play screen
    let play_screen = element(doc, "div", "siven-play-screen", "display:none;")?;
    let header = element(doc, "div", "", "display:flex; justify-content:space-between; margin-bottom:16px;")?;
    let score = element(doc, "div", "siven-score", BADGE_STYLE)?;
    let bonus = element(doc, "div", "siven-bonus", BADGE_STYLE)?;
    header.append_child(&score)?;
    header.append_child(&bonus)?;
    play_screen.append_child(&header)?;

    let timer_track = element(
        doc,
        "div",
        "",
        "position:relative; height:40px; border:4px solid #facc15; border-radius:999px; overflow:hidden; background:rgba(0,0,0,0.4);",
    )?;
    let timer_fill = element(doc, "div", "siven-timer", "")?;
    timer_track.append_child(&timer_fill)?;
    let timer_label = text(
        doc,
        "span",
        "position:absolute; inset:0; display:flex; align-items:center; justify-content:center; color:#facc15; font-weight:900; letter-spacing:3px; text-transform:uppercase;",
        "⏱ Čas běží",
    )?;
    timer_track.append_child(&timer_label)?;
    play_screen.append_child(&timer_track)?;

    let question = text(doc, "h2", "font-size:72px; font-weight:900; margin:48px 0;", "")?;
    question.set_id("siven-question");
    play_screen.append_child(&question)?;

    let grid = element(doc, "div", "", "display:grid; gap:16px;")?;
    let mut options = Vec::with_capacity(OPTION_COUNT);
    for index in 0..OPTION_COUNT {
        let button: HtmlButtonElement = doc.create_element("button")?.dyn_into()?;
        button.set_id(&format!("siven-option-{index}"));
        button.set_attribute("style", OPTION_STYLE)?;
        on_click(&button, move |game| {
            game.submit_option(index);
        })?;
        grid.append_child(&button)?;
        options.push(button);
    }
    play_screen.append_child(&grid)?;
    let hint = text(
        doc,
        "div",
        "margin-top:24px; color:rgba(129,140,248,0.6);",
        "Vypočítej správný výsledek!",
    )?;
    hint.set_id("siven-hint");
    play_screen.append_child(&hint)?;
    root.append_child(&play_screen)?;

    let overlay = text(
        doc,
        "div",
        "display:none;",
        "🙌 67 🙌",
    )?;
    overlay.set_id("siven-overlay");
    body.append_child(&overlay)?;

    on_click(&play_button, |game| {
        game.start();
    })?;
    on_click(&bonus, |game| {
        game.claim_bonus();
    })?;
    on_click(&overlay, |game| game.dismiss_overlay())?;

    Ok(Ui {
        start_screen,
        play_screen,
        high_score,
        score,
        bonus,
        timer_fill,
        question,
        options,
        overlay,
    })
}

fn render(app: &App) {
    let ui = &app.ui;
    let session = app.game.session();
    let started = session.phase() != Phase::Start;
    let show = |el: &HtmlElement, visible: bool, style: &str| {
        let display = if visible { "" } else { "display:none;" };
        el.set_attribute("style", &format!("{style}{display}")).ok();
    };

    show(&ui.start_screen, !started, CARD_STYLE);
    show(&ui.play_screen, started, "width:100%; max-width:480px; padding:24px;");
    ui.high_score
        .set_text_content(Some(&format!("🏆 Nejlepší skóre: {}", session.high_score())));

    ui.score.set_text_content(Some(&format!("🏆 {}", session.score())));
    ui.bonus.set_text_content(Some(&format!("⚡ {}", session.bonus_counter())));
    let bonus_border = if session.bonus_counter() > 0 {
        "border:1px solid #eab308; color:#facc15; cursor:pointer;"
    } else {
        "border:1px solid transparent; color:#6b7280; cursor:pointer;"
    };
    ui.bonus
        .set_attribute("style", &format!("{BADGE_STYLE}{bonus_border}"))
        .ok();

    ui.timer_fill
        .set_attribute(
            "style",
            &format!(
                "width:{:.2}%; height:100%; background:linear-gradient(90deg,#facc15,#ff477e,#a855f7); transition:width 0.05s linear;",
                session.time_fraction() * 100.0
            ),
        )
        .ok();

    let feedback = match session.phase() {
        Phase::Feedback(f) => Some(f),
        _ => None,
    };
    match session.problem() {
        Some(problem) => {
            ui.question.set_text_content(Some(problem.question()));
            for (button, &value) in ui.options.iter().zip(problem.options().iter()) {
                button.set_text_content(Some(&value.to_string()));
                let correct = problem.is_correct(value);
                let extra = match (feedback, correct) {
                    (Some(Feedback::Correct), true) => "background:rgba(34,197,94,0.4); border-color:#4ade80;",
                    (Some(Feedback::Wrong), true) => "background:rgba(34,197,94,0.2);",
                    (Some(Feedback::Wrong), false) => "opacity:0.5;",
                    _ => "",
                };
                button.set_attribute("style", &format!("{OPTION_STYLE}{extra}")).ok();
                button.set_disabled(feedback.is_some());
            }
        }
        None => ui.question.set_text_content(None),
    }

    show(
        &ui.overlay,
        app.game.overlay_visible(),
        "position:fixed; inset:0; z-index:100; display:flex; align-items:center; justify-content:center; font-size:120px; font-weight:900; color:#ffd700; background:rgba(0,0,0,0.6); backdrop-filter:blur(12px); cursor:pointer;",
    );
}

fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{e}; high score will not survive a reload");
            Box::new(MemoryStore::new())
        }
    }
}

/// Build the page and install the game. A second call keeps the running game.
pub fn mount(config: GameConfig) -> Result<(), JsValue> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::warn!("game already mounted");
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let ui = build_ui(&doc)?;
    let game = Game::new(config, open_store(), WebTimers::new(win), StdRng::from_entropy());
    let app = App { game, ui };
    render(&app);
    APP.with(|cell| cell.replace(Some(app)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_delay_saturates_instead_of_wrapping() {
        assert_eq!(browser_delay(600), 600);
        assert_eq!(browser_delay(0), 0);
        assert_eq!(browser_delay(i32::MAX as u32), i32::MAX);
        assert_eq!(browser_delay(i32::MAX as u32 + 1), i32::MAX);
        assert_eq!(browser_delay(u32::MAX), i32::MAX);
    }
}
