use basalt_config::config::{BasaltConfig, SchedulerKind};
use basalt_runtime::{ParallelRun, SequentialRun, StdThreading};
use basalt_samples::{feedback, larger, simple};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/basalt.toml".to_string());
    let config = BasaltConfig::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let graph = Arc::new(match config.sample.as_str() {
        "simple" => simple(),
        "larger" => larger(),
        "feedback" => feedback(),
        other => return Err(format!("unknown sample graph '{other}'").into()),
    });

    info!(
        "BASALT: running '{sample}' for {iterations} iterations ({scheduler:?})",
        sample = config.sample,
        iterations = config.iterations,
        scheduler = config.scheduler
    );

    match config.scheduler {
        SchedulerKind::Sequential => {
            let mut run = SequentialRun::new(Arc::clone(&graph), config.iterations)?;
            run.execute()?;
            report(run.repetitions(), &graph, |actor, output| {
                run.recorded_tokens(actor, output)
            });
        }
        SchedulerKind::Parallel => {
            let threading = StdThreading {
                poll_interval: Duration::from_micros(config.poll_interval_us),
            };
            let mut run = ParallelRun::new(Arc::clone(&graph), config.iterations)?;
            run.execute(&threading)?;
            report(run.repetitions(), &graph, |actor, output| {
                run.recorded_tokens(actor, output)
            });
        }
    }

    Ok(())
}

fn report(
    repetitions: &[u64],
    graph: &basalt_graph::Graph,
    recorded: impl Fn(usize, usize) -> Vec<u8>,
) {
    info!(?repetitions, "run completed");
    for (actor_id, actor) in graph.actors.iter().enumerate() {
        for output_id in 0..actor.outputs.len() {
            let bytes = recorded(actor_id, output_id);
            let tokens = bytes.len() / actor.outputs[output_id].token_size;
            info!(
                actor = actor_id,
                output = output_id,
                tokens,
                head = ?&bytes[..bytes.len().min(16)],
                "recorded output"
            );
        }
    }
}
