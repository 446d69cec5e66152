mod telemetry;

use payloop_infra::{run_migration, setup_context};
use payloop_scheduler::RentReminderScheduler;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("payloop".into(), "info".into());
    init_subscriber(subscriber);

    run_migration()
        .await
        .expect("Database migrations to succeed");

    let context = setup_context().await;

    let scheduler = RentReminderScheduler::new(context);
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping the reminder scheduler");
    scheduler.stop();

    Ok(())
}
