use proposey_db::{
    connect_with_config, migrations, ProposalLogRepository, SqlProposalLogRepository,
    DEFAULT_RECENT_LIMIT,
};
use serde_json::json;

use crate::commands::{
    current_thread_runtime, load_config, CommandResult, EXIT_DATABASE, EXIT_MIGRATION,
};

pub fn run(limit: Option<u32>, email: Option<&str>) -> CommandResult {
    let config = match load_config("history") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match current_thread_runtime("history") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), EXIT_DATABASE))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), EXIT_MIGRATION))?;

        let repository = SqlProposalLogRepository::new(pool.clone());
        let records = match email.map(str::trim).filter(|email| !email.is_empty()) {
            Some(email) => repository.find_by_email(email).await,
            None => repository.recent_proposals(limit.unwrap_or(DEFAULT_RECENT_LIMIT)).await,
        }
        .map_err(|error| ("history_query", error.to_string(), EXIT_DATABASE))?;

        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(records)
    });

    match result {
        Ok(records) => CommandResult::success_with_data(
            "history",
            format!("{} proposal log entries", records.len()),
            Some(json!(records)),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("history", error_class, message, exit_code)
        }
    }
}
