use anyhow::Result;
use log::{debug, info};
use std::io::Write;
use vikunja_lib::Client;
use vikunja_lib::resource::Task;

use crate::formatters::markdown::Markdown;
use crate::formatters::{write_json, write_markdown};
use crate::options::{OutputFormat, ResourceCommand};

fn markdown(client: &Client) -> Markdown {
    Markdown::new(client.config().api_url())
}

pub(crate) async fn projects(
    client: &Client,
    action: ResourceCommand,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    let projects = client.projects();
    match action {
        ResourceCommand::List => {
            let list = projects.list().await?;
            match format {
                OutputFormat::Json => write_json(writer, &list),
                OutputFormat::Markdown => {
                    write_markdown(writer, &markdown(client).project_list(&list))
                }
            }
        }
        ResourceCommand::Get { id } => {
            let project = projects.get(id).await?;
            match format {
                OutputFormat::Json => write_json(writer, &project),
                OutputFormat::Markdown => {
                    let tasks: Vec<Task> = client
                        .tasks()
                        .list()
                        .await?
                        .into_iter()
                        .filter(|task| task.project_id == id)
                        .collect();
                    debug!("Project {id} has {} tasks", tasks.len());
                    write_markdown(writer, &markdown(client).project(&project, &tasks))
                }
            }
        }
        ResourceCommand::Delete { id } => {
            projects.delete(id).await?;
            info!("Deleted project {id}");
            Ok(())
        }
    }
}

pub(crate) async fn tasks(
    client: &Client,
    action: ResourceCommand,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    let tasks = client.tasks();
    match action {
        ResourceCommand::List => {
            let list = tasks.list().await?;
            match format {
                OutputFormat::Json => write_json(writer, &list),
                OutputFormat::Markdown => write_markdown(writer, &markdown(client).task_list(&list)),
            }
        }
        ResourceCommand::Get { id } => {
            let task = tasks.get(id).await?;
            match format {
                OutputFormat::Json => write_json(writer, &task),
                OutputFormat::Markdown => write_markdown(writer, &markdown(client).task(&task)),
            }
        }
        ResourceCommand::Delete { id } => {
            tasks.delete(id).await?;
            info!("Deleted task {id}");
            Ok(())
        }
    }
}
