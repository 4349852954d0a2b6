#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use gloo_net::http::Request;
    use leptos::*;
    use levelquiz::{
        BUILTIN_LEVEL_COUNT, CoinGateway, KeyValueStore, LevelRow, QuestionCatalog, QuestionList,
        Quiz, QuizConfig, QuizSnapshot, StorageError, builtin_catalog,
    };
    use rand::SeedableRng;
    use wasm_bindgen::JsValue;

    const TICK: Duration = Duration::from_millis(50);
    const AUTO_DISMISS_MS: u64 = 4000;

    struct LocalStorageStore;

    fn js_error(value: JsValue) -> StorageError {
        StorageError::Unavailable(format!("{value:?}"))
    }

    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        leptos::window()
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage is missing".to_string()))
    }

    #[async_trait(?Send)]
    impl KeyValueStore for LocalStorageStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            local_storage()?.get_item(key).map_err(js_error)
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            local_storage()?.set_item(key, value).map_err(js_error)
        }
    }

    async fn fetch_catalog() -> Result<QuestionCatalog, String> {
        let list = Request::get("questions.json")
            .send()
            .await
            .map_err(|error| error.to_string())?
            .json::<QuestionList>()
            .await
            .map_err(|error| error.to_string())?;

        QuestionCatalog::new(list.questions).map_err(|error| error.to_string())
    }

    fn web_config() -> QuizConfig {
        QuizConfig {
            auto_dismiss_ms: Some(AUTO_DISMISS_MS),
            shuffle_options: true,
            ..QuizConfig::default()
        }
    }

    fn start_quiz(catalog: QuestionCatalog) -> Quiz {
        let mut rng = rand::rngs::StdRng::from_entropy();
        Quiz::start(catalog, web_config(), &mut rng)
    }

    type Shared = Rc<RefCell<Quiz>>;
    type Gateway = Rc<CoinGateway<LocalStorageStore>>;

    /// Publishes the current snapshot and hands coin changes to storage.
    fn sync(quiz: &Shared, gateway: &Gateway, snapshot: RwSignal<QuizSnapshot>) {
        let (events, next) = {
            let mut quiz = quiz.borrow_mut();
            (quiz.drain_events(), quiz.snapshot())
        };

        if !events.is_empty() {
            let gateway = Rc::clone(gateway);
            spawn_local(async move { gateway.persist(&events).await });
        }

        snapshot.set(next);
    }

    #[component]
    fn LevelLadder(rows: Vec<LevelRow>) -> impl IntoView {
        view! {
            <ol class="level-ladder">
                {rows
                    .into_iter()
                    .rev()
                    .map(|row| {
                        let class = if row.colored {
                            "level colored"
                        } else if row.reward.is_some() {
                            "level reward"
                        } else {
                            "level"
                        };
                        view! {
                            <li class=class class:highlighted=row.highlighted>
                                <span class="level-number">{format!("Level {}", row.level)}</span>
                                {row
                                    .reward
                                    .map(|reward| {
                                        view! {
                                            <span class="level-reward">{format!("+{reward} coins")}</span>
                                        }
                                    })}
                            </li>
                        }
                    })
                    .collect_view()}
            </ol>
        }
    }

    #[component]
    fn App() -> impl IntoView {
        let quiz: Shared = Rc::new(RefCell::new(start_quiz(builtin_catalog())));
        let gateway: Gateway = Rc::new(CoinGateway::new(LocalStorageStore));
        let snapshot = create_rw_signal(quiz.borrow().snapshot());
        let ladder = create_rw_signal(quiz.borrow().level_ladder(BUILTIN_LEVEL_COUNT));

        let refresh = {
            let quiz = Rc::clone(&quiz);
            let gateway = Rc::clone(&gateway);
            Rc::new(move || {
                sync(&quiz, &gateway, snapshot);
                let max_level = quiz.borrow().catalog().len() as u32;
                ladder.set(quiz.borrow().level_ladder(max_level));
            })
        };

        {
            let quiz = Rc::clone(&quiz);
            let gateway = Rc::clone(&gateway);
            let refresh = Rc::clone(&refresh);
            spawn_local(async move {
                // Stored coins land before any play so the first save cannot
                // overwrite them.
                if let Some(coins) = gateway.load_coins().await {
                    quiz.borrow_mut().restore_coins(coins);
                }
                refresh();

                let catalog = match fetch_catalog().await {
                    Ok(catalog) => catalog,
                    Err(error) => {
                        tracing::warn!(%error, "keeping the built-in questions");
                        return;
                    }
                };
                if quiz.borrow().has_started() {
                    tracing::debug!("session already under way; ignoring fetched questions");
                    return;
                }

                let coins = quiz.borrow().progression().coins;
                let mut next = start_quiz(catalog);
                next.restore_coins(coins);
                *quiz.borrow_mut() = next;
                refresh();
            });
        }

        let last_tick = Rc::new(RefCell::new(js_sys::Date::now()));
        let interval = {
            let quiz = Rc::clone(&quiz);
            let refresh = Rc::clone(&refresh);
            set_interval_with_handle(
                move || {
                    let now = js_sys::Date::now();
                    let elapsed = (now - *last_tick.borrow()).max(0.0) as u64;
                    *last_tick.borrow_mut() = now;

                    quiz.borrow_mut()
                        .advance_time(Duration::from_millis(elapsed));
                    refresh();
                },
                TICK,
            )
        };

        {
            let quiz = Rc::clone(&quiz);
            on_cleanup(move || {
                if let Ok(handle) = interval {
                    handle.clear();
                }
                quiz.borrow_mut().teardown();
            });
        }

        let select = {
            let quiz = Rc::clone(&quiz);
            let refresh = Rc::clone(&refresh);
            move |option: usize| {
                if quiz.borrow_mut().select_option(option).is_ok() {
                    refresh();
                }
            }
        };

        let close = {
            let quiz = Rc::clone(&quiz);
            let refresh = Rc::clone(&refresh);
            move |_: ev::MouseEvent| {
                quiz.borrow_mut().close_modal_now();
                refresh();
            }
        };

        let restart = {
            let quiz = Rc::clone(&quiz);
            let refresh = Rc::clone(&refresh);
            move |_: ev::MouseEvent| {
                quiz.borrow_mut().restart_quiz();
                refresh();
            }
        };

        let coin_done = {
            let quiz = Rc::clone(&quiz);
            let refresh = Rc::clone(&refresh);
            move |_: ev::AnimationEvent| {
                quiz.borrow_mut().coin_animation_complete();
                refresh();
            }
        };

        view! {
            <main class="page">
                <header class="page-header">
                    <div>
                        <p class="level">
                            {move || {
                                let current = snapshot.get();
                                format!(
                                    "Level {} / {}",
                                    current.progression.current_level,
                                    current.total_questions,
                                )
                            }}
                        </p>
                        <p class="progress-small">
                            {move || {
                                let current = snapshot.get();
                                let shown = (current.progression.current_question_index + 1)
                                    .min(current.total_questions);
                                format!("{} of {} questions", shown, current.total_questions)
                            }}
                        </p>
                    </div>
                    <div class="coins-box">
                        <p class="label">Coins</p>
                        <p class="value">{move || snapshot.get().progression.coins.to_string()}</p>
                    </div>
                </header>

                <Show when=move || snapshot.get().coin_animation>
                    <div class="coin-flight" on:animationend=coin_done.clone()></div>
                </Show>

                {move || {
                    let current = snapshot.get();
                    match current.current_question {
                        Some(question) => {
                            let select = select.clone();
                            view! {
                                <section class="quiz-card">
                                    <p class="prompt">{question.text.clone()}</p>
                                    <div class="options-list">
                                        {question
                                            .options
                                            .iter()
                                            .enumerate()
                                            .map(|(index, option)| {
                                                let select = select.clone();
                                                let picked = current.selected_option == Some(index);
                                                view! {
                                                    <button
                                                        class="option"
                                                        class:picked=picked
                                                        disabled=current.selected_option.is_some()
                                                        on:click=move |_| select(index)
                                                    >
                                                        {option.clone()}
                                                    </button>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                </section>
                            }
                            .into_view()
                        }
                        None => view! {
                            <section class="complete-card">
                                <p class="eyebrow">Quiz complete</p>
                                <p class="lede">
                                    {format!("You finished with {} coins.", current.progression.coins)}
                                </p>
                                <button class="primary" on:click=restart.clone()>"Play again"</button>
                            </section>
                        }
                        .into_view(),
                    }
                }}

                <Show when=move || snapshot.get().notification.visible>
                    <div class="backdrop">
                        <section class="level-modal">
                            <button class="close" on:click=close.clone()>"X"</button>
                            <p class="title">
                                {move || {
                                    snapshot
                                        .get()
                                        .notification
                                        .info
                                        .map(|info| info.title)
                                        .unwrap_or_default()
                                }}
                            </p>
                            <p class="subtitle">
                                {move || {
                                    snapshot
                                        .get()
                                        .notification
                                        .info
                                        .and_then(|info| info.subtitle)
                                        .unwrap_or_default()
                                }}
                            </p>
                            {move || view! { <LevelLadder rows=ladder.get() /> }}
                        </section>
                    </div>
                </Show>
            </main>
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        mount_to_body(|| view! { <App /> });
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    web::run();
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    headless::run().await
}

/// Plays the catalog without a screen, answering every question correctly.
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use anyhow::Context;
    use levelquiz::{CoinGateway, JsonFileStore, Quiz, QuizConfig, builtin_catalog};
    use rand::SeedableRng;
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    const STEP: Duration = Duration::from_millis(100);

    pub async fn run() -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let config = match std::env::var("LEVELQUIZ_CONFIG") {
            Ok(path) => QuizConfig::from_file(&path)
                .with_context(|| format!("loading config from {path}"))?,
            Err(_) => QuizConfig::default(),
        };
        let store_path = std::env::var("LEVELQUIZ_STORE")
            .unwrap_or_else(|_| "levelquiz-store.json".to_string());

        let gateway = CoinGateway::new(JsonFileStore::new(store_path));
        let mut rng = rand::rngs::StdRng::from_entropy();
        let mut quiz = Quiz::start(builtin_catalog(), config, &mut rng);
        gateway.restore_into(&mut quiz).await;

        while let Some(question) = quiz.current_question().cloned() {
            info!(id = question.id, text = %question.text, "question");
            quiz.select_option(question.correct_index)
                .context("selecting the correct option")?;

            while !quiz.notification().visible || quiz.pending_effects() > 0 {
                quiz.advance_time(STEP);
                if quiz.current_question().map(|current| current.id) != Some(question.id) {
                    break;
                }
            }

            if quiz.notification().visible {
                quiz.close_modal_now();
            }
            gateway.persist(&quiz.drain_events()).await;
        }

        let state = quiz.progression();
        info!(
            level = state.current_level,
            coins = state.coins,
            elapsed_ms = quiz.snapshot().elapsed_ms,
            "quiz complete"
        );

        Ok(())
    }
}
