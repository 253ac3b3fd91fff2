use std::env;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::signal;

use lora_lab::{
    AdapterShape, LabConfig, Playground, SentimentResult, TrainingEvent, TrainingSession,
};

const SEED_VAR: &str = "LORA_LAB_SEED";
const SAMPLE_TEXT: &str = "这部电影太精彩了，我非常喜欢演员的演技。";
const LOG_EVERY: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => LabConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => LabConfig::default(),
    };

    if let Ok(seed) = env::var(SEED_VAR) {
        let seed = seed
            .parse()
            .with_context(|| format!("{SEED_VAR} must be an unsigned integer"))?;
        config.simulation.seed = Some(seed);
    }

    let mut texts: Vec<String> = args.collect();
    if texts.is_empty() {
        texts.push(SAMPLE_TEXT.to_string());
    }

    let hp = config.hyperparameters;
    let shape = AdapterShape::GPT2_PROJECTION;
    info!(
        "rank={} alpha={} (scaling {:.2}) lr={} epochs={} batch={}",
        hp.rank,
        hp.alpha,
        hp.scaling(),
        hp.learning_rate,
        hp.epochs,
        hp.batch_size
    );
    info!(
        "adapter trains {} of {} params per {}x{} projection ({:.2}%)",
        shape.trainable_params(hp.rank),
        shape.frozen_params(),
        shape.d_out,
        shape.d_in,
        shape.trainable_ratio(hp.rank) * 100.0
    );

    let playground = Playground::new(config.inference);
    println!("-- base model --");
    classify_all(&playground, &texts, false).await;

    let mut session = TrainingSession::new(config.simulation)?;
    let mut events = session.subscribe();
    session.start(hp)?;

    let completed = tokio::select! {
        history = async {
            while let Some(event) = events.recv().await {
                match event {
                    TrainingEvent::Progress { history, progress_percent, .. } => {
                        if let Some(point) = history.last().filter(|p| p.step % LOG_EVERY == 0) {
                            info!(
                                "[{progress_percent:>5.1}%] step {:>3} loss={:.3} accuracy={:.3}",
                                point.step, point.loss, point.accuracy
                            );
                        }
                    }
                    TrainingEvent::Completed { history, .. } => return Some(history),
                }
            }
            None
        } => history,
        _ = signal::ctrl_c() => {
            session.cancel();
            warn!("training interrupted");
            None
        }
    };

    let Some(history) = completed else {
        return Ok(());
    };

    if let Some(last) = history.last() {
        println!(
            "fine-tuned in {} steps: loss={:.3} accuracy={:.3}",
            last.step, last.loss, last.accuracy
        );
    }

    println!("-- fine-tuned model --");
    classify_all(&playground, &texts, session.is_trained()).await;
    Ok(())
}

async fn classify_all(playground: &Playground, texts: &[String], trained: bool) {
    for text in texts {
        if let Some(result) = playground.analyze(text, trained).await {
            print_result(text, &result);
        }
    }
}

fn print_result(text: &str, result: &SentimentResult) {
    println!(
        "{:<8} {:>5.1}%  {text}",
        result.label.to_string(),
        result.score * 100.0
    );
}
