use gloo::timers::callback::Timeout;
use minimines_core::{CellCount, GameConfig, Pixel, Session, SessionState, TileColor};
use yew::prelude::*;

use crate::level;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    LevelLoaded(GameConfig),
    Start,
    Restart,
    BoardClick(Pixel, Pixel),
    UnlockInput,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    #[prop_or_default]
    pub seed_override: Option<u64>,
}

/// Seed material from JavaScript's Math.random.
fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    let hi = (random() * 4294967296.0) as u64;
    let lo = (random() * 4294967296.0) as u64;
    (hi << 32) | lo
}

/// Outer size of the board surface: tiles plus the padding band on each side.
fn board_px_size(config: &GameConfig) -> (Pixel, Pixel) {
    (
        config.cols as Pixel * config.tile_size + 2 * config.padding,
        config.rows as Pixel * config.tile_size + 2 * config.padding,
    )
}

fn hud_line(clicked: CellCount, total: CellCount) -> String {
    format!("Safe clicked: {} / {}", clicked, total)
}

fn end_title(state: SessionState) -> &'static str {
    match state {
        SessionState::Won => "You won!",
        SessionState::Lost => "Boom. You hit a mine.",
        SessionState::Intro | SessionState::Playing => "",
    }
}

/// The render/input adapter: owns the session, feeds it commands and clicks,
/// and repaints from its state.
pub(crate) struct GameView {
    session: Session,
    board_ref: NodeRef,
}

impl GameView {
    fn next_seed(&self, ctx: &Context<Self>) -> u64 {
        ctx.props().seed_override.unwrap_or_else(js_random_seed)
    }

    /// Clears the input guard at the end of the current event-processing
    /// turn, after any click coalesced with the start/restart button has
    /// already been dispatched and swallowed.
    fn schedule_unlock(ctx: &Context<Self>) {
        let link = ctx.link().clone();
        Timeout::new(0, move || link.send_message(Msg::UnlockInput)).forget();
    }

    fn view_tiles(&self) -> Html {
        let size = self.session.grid().tile_size();
        html! {
            for self.session.grid().iter().map(|tile| {
                let (px, py) = tile.pixel_origin();
                let class = classes!(
                    "tile",
                    match tile.color() {
                        TileColor::Hidden => "hidden",
                        TileColor::Safe => "safe",
                        TileColor::Mine => "mine",
                    }
                );
                let style =
                    format!("left:{}px;top:{}px;width:{}px;height:{}px;", px, py, size, size);
                html! { <div {class} {style}/> }
            })
        }
    }

    fn view_hud(&self) -> Html {
        if matches!(self.session.state(), SessionState::Intro) {
            return Html::default();
        }
        html! {
            <header class="hud">
                { hud_line(self.session.safe_clicked(), self.session.safe_total()) }
            </header>
        }
    }

    fn view_intro(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(|_| Msg::Start);
        html! {
            <div class="overlay">
                <article>
                    <h1>{"Mini Mines"}</h1>
                    <h2>{"How to Play"}</h2>
                    <p>{"Click tiles one-by-one."}</p>
                    <p>{"Safe tile = turns green."}</p>
                    <p>{"Mine tile = turns red and the game ends."}</p>
                    <p>{"Click all safe tiles to win."}</p>
                    <p>{"No numbers. No hints. Just memory and luck."}</p>
                    <button onclick={onclick}>{"Start"}</button>
                </article>
            </div>
        }
    }

    fn view_end(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(|_| Msg::Restart);
        html! {
            <div class="overlay">
                <article>
                    <h1>{ end_title(self.session.state()) }</h1>
                    <p>{ format!("Green tiles: {}", self.session.safe_clicked()) }</p>
                    <p class="dim">{"Play again to reset the board"}</p>
                    <button onclick={onclick}>{"Play Again"}</button>
                </article>
            </div>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        ctx.link()
            .send_future(async { Msg::LevelLoaded(level::load_level().await) });
        Self {
            session: Session::new(GameConfig::default()),
            board_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::LevelLoaded(config) => {
                // a level arriving after the player already started is stale
                if matches!(self.session.state(), SessionState::Intro) {
                    self.session = Session::new(config);
                    true
                } else {
                    false
                }
            }
            Msg::Start => {
                self.session.start(self.next_seed(ctx));
                Self::schedule_unlock(ctx);
                true
            }
            Msg::Restart => {
                self.session.restart(self.next_seed(ctx));
                Self::schedule_unlock(ctx);
                true
            }
            Msg::BoardClick(px, py) => {
                log::debug!("board click at ({}, {})", px, py);
                self.session.click_pixel(px, py).has_update()
            }
            Msg::UnlockInput => {
                self.session.unlock_input();
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (width, height) = board_px_size(self.session.config());
        let style = format!("width:{}px;height:{}px;", width, height);

        // One handler on the board surface; tile lookup happens in the grid's
        // pixel mapping. Button clicks in the overlays bubble here too, which
        // is exactly the coalesced event the input lock swallows.
        let board_ref = self.board_ref.clone();
        let onclick = ctx.link().callback(move |e: MouseEvent| {
            let rect = board_ref
                .cast::<web_sys::Element>()
                .expect("board surface is mounted")
                .get_bounding_client_rect();
            Msg::BoardClick(
                (f64::from(e.client_x()) - rect.left()).floor() as Pixel,
                (f64::from(e.client_y()) - rect.top()).floor() as Pixel,
            )
        });

        let overlay = match self.session.state() {
            SessionState::Intro => self.view_intro(ctx),
            SessionState::Playing => Html::default(),
            SessionState::Won | SessionState::Lost => self.view_end(ctx),
        };

        html! {
            <div class="minimines" ref={self.board_ref.clone()} {style} {onclick}>
                { self.view_tiles() }
                { self.view_hud() }
                { overlay }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_size_includes_the_padding_band() {
        let config = GameConfig::default();

        assert_eq!(board_px_size(&config), (8 * 64 + 32, 6 * 64 + 32));
    }

    #[test]
    fn hud_line_formats_progress() {
        assert_eq!(hud_line(3, 38), "Safe clicked: 3 / 38");
    }

    #[test]
    fn end_titles_cover_both_outcomes() {
        assert_eq!(end_title(SessionState::Won), "You won!");
        assert_eq!(end_title(SessionState::Lost), "Boom. You hit a mine.");
    }
}
