//! Terminal Front End
//!
//! Renders each `QuizView` to stdout and turns menu choices into
//! controller calls. Holds no quiz state of its own: every screen is
//! derived from the latest snapshot.

use std::future::Future;
use std::io::Write;

use dialoguer::{Confirm, Input, Select};

use crate::services::presentation::{render, AnalyzingTicker, QuizView, TICK_INTERVAL};
use crate::services::quiz::{QuizController, QuizSnapshot};
use crate::utils::error::{AppError, AppResult};

const BAR_WIDTH: usize = 30;

/// Interactive quiz driver
pub struct Terminal {
    controller: QuizController,
}

/// What the user picked on a screen with a menu
enum Next {
    Snapshot(QuizSnapshot),
    Quit,
}

impl Terminal {
    pub fn new(controller: QuizController) -> Self {
        Self { controller }
    }

    /// Run until the user quits
    pub async fn run(&self) -> AppResult<()> {
        let mut snapshot = self.controller.snapshot().await;
        loop {
            let view = render(&snapshot);
            print_view(&view);
            match self.step(view).await? {
                Next::Snapshot(next) => snapshot = next,
                Next::Quit => return Ok(()),
            }
        }
    }

    async fn step(&self, view: QuizView) -> AppResult<Next> {
        let next = match view {
            QuizView::Welcome => {
                if !confirm("Start the quiz?").await? {
                    return Ok(Next::Quit);
                }
                with_spinner(self.controller.start_quiz()).await?
            }
            QuizView::Question {
                number,
                total,
                options,
                ..
            } => {
                let mut items: Vec<String> = options.iter().map(|o| o.answer_text()).collect();
                items.push("Restart quiz".to_string());

                let choice = select("Your answer", items).await?;
                if choice == options.len() {
                    self.controller.restart().await
                } else if number == total {
                    with_ticker(self.controller.submit_option(choice)).await?
                } else {
                    self.controller.submit_option(choice).await?
                }
            }
            QuizView::LeadCapture { .. } => {
                let email = input("Your best email").await?;
                self.controller.submit_email(&email).await?
            }
            QuizView::Result { product, .. } => {
                let mut items = Vec::new();
                if product.is_some() {
                    items.push("Get the guide");
                }
                items.extend(["Take the quiz again", "Quit"]);

                let labels = items.iter().map(|s| s.to_string()).collect();
                match items[select("What next?", labels).await?] {
                    "Get the guide" => {
                        let link = self.controller.record_offer_click().await?;
                        println!("\nOpen this link to continue: {}\n", link);
                        return Ok(Next::Quit);
                    }
                    "Take the quiz again" => self.controller.restart().await,
                    _ => return Ok(Next::Quit),
                }
            }
            QuizView::Error { .. } => {
                let items = vec!["Try again".to_string(), "Quit".to_string()];
                if select("What next?", items).await? == 0 {
                    self.controller.restart().await
                } else {
                    return Ok(Next::Quit);
                }
            }
            QuizView::Loading { .. } => self.controller.snapshot().await,
        };
        Ok(Next::Snapshot(next))
    }
}

fn print_view(view: &QuizView) {
    match view {
        QuizView::Loading { message } => println!("{}", message),
        QuizView::Error { message } => println!("\n! {}\n", message),
        QuizView::Welcome => {
            println!("\n=== Find the right plan for your metabolism ===");
            println!("Answer a few quick questions and get a personalized recommendation.\n");
        }
        QuizView::Question {
            number,
            total,
            progress_percent,
            category,
            prompt,
            ..
        } => {
            let filled = BAR_WIDTH * usize::from(*progress_percent) / 100;
            println!(
                "\nSTEP {}/{} [{}{}] {}",
                number,
                total,
                "#".repeat(filled),
                " ".repeat(BAR_WIDTH - filled),
                category.as_deref().unwrap_or_default().to_uppercase()
            );
            println!("{}\n", prompt);
        }
        QuizView::LeadCapture { error } => {
            println!("\nAnalysis 100% complete!");
            println!("Enter your best email below to unlock your result.");
            if let Some(error) = error {
                println!("! {}", error);
            }
        }
        QuizView::Result {
            archetype,
            recommended_title,
            reason,
            product,
        } => {
            println!(
                "\nYour profile: {}",
                archetype.as_deref().unwrap_or("Profile identified")
            );
            match product {
                Some(product) => {
                    println!("\nWe recommend: {}", product.title);
                    println!("{}", product.description);
                }
                None => println!("\nWe recommend: {}", recommended_title),
            }
            println!("\n{}\n", reason);
        }
    }
}

/// Await `fut` while animating the analyzing ticker
async fn with_ticker<F: Future>(fut: F) -> F::Output {
    tokio::pin!(fut);
    let mut ticker = AnalyzingTicker::new();
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        tokio::select! {
            output = &mut fut => {
                let frame = ticker.finish();
                println!("\r[{:>3}%] {:<48}", frame.progress, "Done");
                return output;
            }
            _ = interval.tick() => {
                let frame = ticker.tick();
                print!("\r[{:>3}%] {:<48}", frame.progress, frame.stage);
                let _ = std::io::stdout().flush();
            }
        }
    }
}

/// Await `fut` with a simple dotted progress line
async fn with_spinner<F: Future>(fut: F) -> F::Output {
    tokio::pin!(fut);
    let mut interval = tokio::time::interval(TICK_INTERVAL * 2);
    loop {
        tokio::select! {
            output = &mut fut => {
                println!();
                return output;
            }
            _ = interval.tick() => {
                print!(".");
                let _ = std::io::stdout().flush();
            }
        }
    }
}

/// dialoguer prompts block, so they run off the async workers
async fn blocking_prompt<T, F>(prompt: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
        .map_err(AppError::from)
}

async fn select(prompt: &'static str, items: Vec<String>) -> AppResult<usize> {
    blocking_prompt(move || {
        Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()
    })
    .await
}

async fn confirm(prompt: &'static str) -> AppResult<bool> {
    blocking_prompt(move || Confirm::new().with_prompt(prompt).default(true).interact()).await
}

async fn input(prompt: &'static str) -> AppResult<String> {
    blocking_prompt(move || Input::<String>::new().with_prompt(prompt).interact_text()).await
}
