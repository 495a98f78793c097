//! List demo: a selectable list, a counter and a pinned help line.
//!
//! Keys:
//! - Up/Down move the selection while the list has focus
//! - Tab / Shift+Tab cycle focus between the list and the counter
//! - Enter activates the selected item or bumps the counter
//! - q or Esc quits
//!
//! Set `RUST_LOG=tessel=debug` to write a trace to `list-demo.log`.

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;
use tessel::{layout, Border, Color, Engine, FocusManager, InputEvent, KeyCode, Node, Style};
use tracing_subscriber::EnvFilter;

struct Model {
    items: Vec<&'static str>,
    selected: usize,
    counter: u32,
    last: Option<&'static str>,
}

impl Model {
    fn view(&self, focus: &FocusManager) -> Node {
        let list_focused = focus.is_focused("list");
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if i == self.selected {
                    let bg = if list_focused { Color(6) } else { Color(8) };
                    Node::text_styled(format!("> {item}"), Color(16), bg, Style::BOLD)
                } else {
                    Node::text(format!("  {item}")).with_fg(Color(7))
                }
            })
            .collect();

        let border = if list_focused { Border::Double } else { Border::Rounded };
        let counter_style = if focus.is_focused("counter") {
            Style::REVERSE | Style::BOLD
        } else {
            Style::empty()
        };
        let last = self.last.map_or_else(String::new, |item| format!(" last: {item}"));

        Node::column(vec![
            Node::text_styled(" tessel demo ", Color(16), Color(2), Style::BOLD),
            Node::text(""),
            Node::boxed(border, Node::list(items))
                .with_key("list")
                .with_focusable()
                .with_size(30, 0),
            Node::text(""),
            Node::row(vec![
                Node::text(format!(" [ activations: {} ] ", self.counter))
                    .with_style(counter_style)
                    .with_key("counter")
                    .with_focusable(),
                Node::text(last).with_style(Style::DIM),
            ]),
            Node::spacer(),
            Node::text_styled(
                " ↑/↓ navigate • Tab focus • Enter activate • q quit ",
                Color(8),
                Color::DEFAULT,
                Style::empty(),
            ),
        ])
    }

    fn handle_key(&mut self, code: KeyCode, focus: &mut FocusManager) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Tab => focus.next(),
            KeyCode::BackTab => focus.prev(),
            KeyCode::Up if focus.is_focused("list") => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down if focus.is_focused("list") => {
                self.selected = (self.selected + 1).min(self.items.len() - 1);
            }
            KeyCode::Enter => {
                self.counter += 1;
                if focus.is_focused("list") {
                    self.last = self.items.get(self.selected).copied();
                }
            }
            _ => {}
        }
        true
    }
}

fn init_logging() -> std::io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = File::create("list-demo.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> std::io::Result<()> {
    init_logging()?;

    let mut engine = Engine::new()?;
    let mut focus = FocusManager::new();
    let mut model = Model {
        items: vec!["Alpha", "Beta", "Gamma", "Delta", "Epsilon"],
        selected: 0,
        counter: 0,
        last: None,
    };

    // The focus ring is built from a laid-out tree, so lay out once up front.
    let initial = model.view(&focus);
    focus.update(&layout(&initial, i32::from(engine.width()), i32::from(engine.height())));

    let mut dirty = true;
    while engine.is_running() {
        if dirty {
            let root = model.view(&focus);
            focus.update(&layout(&root, i32::from(engine.width()), i32::from(engine.height())));
            if !engine.submit(root) {
                break;
            }
            dirty = false;
        }

        let Some(event) = engine.wait_input(Duration::from_millis(250)) else {
            continue;
        };
        match event {
            InputEvent::Key { code, modifiers } => {
                if code == KeyCode::Char('c') && modifiers.control {
                    engine.stop();
                } else if !model.handle_key(code, &mut focus) {
                    engine.stop();
                }
                dirty = true;
            }
            InputEvent::Resize { width, height } => {
                engine.handle_resize(width, height);
                dirty = true;
            }
            InputEvent::Error(err) => tracing::warn!(%err, "input error"),
            InputEvent::Shutdown => engine.stop(),
            InputEvent::Scroll { .. } | InputEvent::Paste(_) => {}
        }
    }

    Ok(())
}
