//! GitLab API CLI binary.
//!
//! A command-line interface for interacting with the GitLab API.

use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use foxkit::cli::{Cli, Command, Entity, HttpMethod};
use foxkit::output::PrettyPrint;
use foxkit::{
    Client, Foxkit, FoxkitError, Get, KeyListQuery, List, Page, Project, ProjectRef,
    RequestOptions, Snippet, SshKey, Tag, TreeEntry, TreeQuery, Update, User, UserListQuery,
    UserRef, UserUpdateParams,
};
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FOXKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match Foxkit::new().client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Check FOXKIT_API_ENDPOINT and FOXKIT_PROXY");
            return ExitCode::FAILURE;
        }
    };

    if !client.is_authenticated() {
        tracing::debug!("no credentials configured, sending anonymous requests");
    }

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if e.api_error().is_some_and(|api| api.status().as_u16() == 401) {
                eprintln!("Hint: Set FOXKIT_PRIVATE_TOKEN environment variable");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &Client, cli: Cli) -> foxkit::Result<()> {
    match cli.command {
        Command::Get { entity, id, project } => {
            handle_get(client, entity, &id, project.as_deref(), cli.json).await
        }
        Command::List {
            entity,
            page,
            per_page,
            project,
            user,
            path,
            ref_name,
            search,
        } => {
            let filters = ListFilters {
                project,
                user,
                path,
                ref_name,
                search,
            };
            handle_list(client, entity, page, per_page, filters, cli.json).await
        }
        Command::Update {
            entity,
            id,
            name,
            email,
            bio,
        } => handle_update(client, entity, id, name, email, bio, cli.json).await,
        Command::Api {
            method,
            path,
            fields,
            paginate,
        } => handle_api(client, method, &path, fields, paginate).await,
    }
}

async fn handle_get(
    client: &Client,
    entity: Entity,
    id: &str,
    project: Option<&str>,
    json: bool,
) -> foxkit::Result<()> {
    match entity {
        Entity::Project => {
            let project = Project::get(client, ProjectRef::from_str(id)?).await?;
            output_single(&project, json)?;
        }
        Entity::User => {
            let user = if id == "me" {
                UserRef::Current
            } else {
                UserRef::from(Some(id))
            };
            let user = User::get(client, user).await?;
            output_single(&user, json)?;
        }
        Entity::Key => {
            let key = SshKey::get(client, parse_id(id)?).await?;
            output_single(&key, json)?;
        }
        Entity::Snippet => {
            let project = require_project(project, "snippet")?;
            let snippet = Snippet::get(client, (project, parse_id(id)?)).await?;
            output_single(&snippet, json)?;
        }
        Entity::Tag | Entity::Tree => {
            eprintln!("Error: Tags and trees can only be listed, not retrieved individually");
            eprintln!("Hint: Use 'foxkit list tags --project <owner/name>'");
            return Err(FoxkitError::InvalidIdentity(
                "get tag/tree not supported".to_string(),
            ));
        }
    }
    Ok(())
}

struct ListFilters {
    project: Option<String>,
    user: Option<String>,
    path: Option<String>,
    ref_name: Option<String>,
    search: Option<String>,
}

async fn handle_list(
    client: &Client,
    entity: Entity,
    page: Option<u32>,
    per_page: Option<u32>,
    filters: ListFilters,
    json: bool,
) -> foxkit::Result<()> {
    let page = page.unwrap_or(1);
    let per_page = per_page.unwrap_or(20);

    match entity {
        Entity::Project => {
            eprintln!("Error: Projects are retrieved one at a time");
            eprintln!("Hint: Use 'foxkit get project <owner/name>'");
            return Err(FoxkitError::InvalidIdentity(
                "list projects not supported".to_string(),
            ));
        }
        Entity::User => {
            let query = UserListQuery {
                search: filters.search,
                ..Default::default()
            };
            let users = User::list_page(client, &query, page, per_page).await?;
            output_page(&users, json, |item| UserRow::from(item))?;
        }
        Entity::Key => {
            let query = KeyListQuery {
                user: UserRef::from(filters.user.as_deref().filter(|u| *u != "me")),
            };
            let keys = SshKey::list_page(client, &query, page, per_page).await?;
            output_page(&keys, json, |item| KeyRow::from(item))?;
        }
        Entity::Tag => {
            let project = require_project(filters.project.as_deref(), "tags")?;
            let tags = Tag::list_page(client, &project.to_string(), page, per_page).await?;
            output_page(&tags, json, |item| TagRow::from(item))?;
        }
        Entity::Tree => {
            let project = require_project(filters.project.as_deref(), "tree")?;
            let query = TreeQuery {
                path: filters.path,
                ref_name: filters.ref_name,
            };
            let entries = TreeEntry::list_page(client, &(project.to_string(), query), page, per_page)
                .await?;
            output_page(&entries, json, |item| TreeRow::from(item))?;
        }
        Entity::Snippet => {
            let project = require_project(filters.project.as_deref(), "snippets")?;
            let snippets = Snippet::list_page(client, &project.to_string(), page, per_page).await?;
            output_page(&snippets, json, |item| SnippetRow::from(item))?;
        }
    }
    Ok(())
}

async fn handle_update(
    client: &Client,
    entity: Entity,
    id: u64,
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    json: bool,
) -> foxkit::Result<()> {
    match entity {
        Entity::User => {
            let params = UserUpdateParams {
                name,
                email,
                bio,
                ..Default::default()
            };
            let user = User::update(client, id, params).await?;
            output_single(&user, json)?;
        }
        _ => {
            eprintln!("Error: Only users can be updated via CLI");
            return Err(FoxkitError::InvalidIdentity(
                "only users support update".to_string(),
            ));
        }
    }
    Ok(())
}

async fn handle_api(
    client: &Client,
    method: HttpMethod,
    path: &str,
    fields: Vec<(String, Value)>,
    paginate: bool,
) -> foxkit::Result<()> {
    let options = fields
        .into_iter()
        .fold(RequestOptions::new(), |options, (key, value)| {
            options.field(key, value)
        });

    if paginate && method == HttpMethod::Get {
        let body = client.paginate(path, options).await?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let envelope = client.request(method.into(), path, options).await?;
    if envelope.body.is_null() {
        println!("{}", envelope.status);
    } else {
        println!("{}", serde_json::to_string_pretty(&envelope.body)?);
    }
    Ok(())
}

fn parse_id(raw: &str) -> foxkit::Result<u64> {
    raw.parse()
        .map_err(|_| FoxkitError::InvalidIdentity(format!("expected a numeric id, got '{raw}'")))
}

fn require_project(project: Option<&str>, what: &str) -> foxkit::Result<ProjectRef> {
    let project = project.ok_or_else(|| {
        FoxkitError::InvalidIdentity(format!("--project required for {what}"))
    })?;
    ProjectRef::from_str(project)
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> foxkit::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> foxkit::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        if let Some(total) = page.total {
            let total_pages = total.div_ceil(u64::from(page.per_page.max(1)));
            println!("\nPage {}/{} ({} total items)", page.page, total_pages, total);
        } else if page.has_more {
            println!("\nPage {} (more available)", page.page);
        } else {
            println!("\nPage {} (end)", page.page);
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct UserRow {
    id: u64,
    username: String,
    name: String,
    state: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            name: u.name.clone().unwrap_or_default(),
            state: u.state.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct KeyRow {
    id: u64,
    title: String,
    #[tabled(rename = "type")]
    key_type: String,
}

impl From<&SshKey> for KeyRow {
    fn from(k: &SshKey) -> Self {
        Self {
            id: k.id,
            title: k.title.clone(),
            key_type: k.key_type().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Tabled)]
struct TagRow {
    name: String,
    commit: String,
    protected: bool,
}

impl From<&Tag> for TagRow {
    fn from(t: &Tag) -> Self {
        Self {
            name: t.name.clone(),
            commit: t.sha().map(|s| s.chars().take(8).collect()).unwrap_or_default(),
            protected: t.protected,
        }
    }
}

#[derive(Tabled)]
struct TreeRow {
    name: String,
    #[tabled(rename = "type")]
    kind: String,
    mode: String,
}

impl From<&TreeEntry> for TreeRow {
    fn from(e: &TreeEntry) -> Self {
        Self {
            name: if e.is_dir() {
                format!("{}/", e.name)
            } else {
                e.name.clone()
            },
            kind: e.kind.clone(),
            mode: e.mode.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct SnippetRow {
    id: u64,
    title: String,
    file: String,
    author: String,
}

impl From<&Snippet> for SnippetRow {
    fn from(s: &Snippet) -> Self {
        Self {
            id: s.id,
            title: s.title.clone(),
            file: s.file_name.clone().unwrap_or_default(),
            author: s
                .author
                .as_ref()
                .map(|a| a.username.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde_json::json;

    fn page_of<T: DeserializeOwned>(items: Value) -> Page<T> {
        Page {
            items: serde_json::from_value(items).unwrap(),
            total: Some(3),
            page: 1,
            per_page: 2,
            has_more: true,
            next: None,
        }
    }

    #[test]
    fn test_every_list_renders_as_table() {
        let users: Page<User> = page_of(json!([{"id": 1, "username": "john_smith"}]));
        let keys: Page<SshKey> = page_of(json!([{"id": 1, "title": "laptop", "key": "ssh-rsa AAAA"}]));
        let tags: Page<Tag> = page_of(json!([{"name": "v1.0.0", "commit": {"id": "2695effb5807a22ff3d138d593fd856244e155e7"}}]));
        let entries: Page<TreeEntry> = page_of(json!([{"id": "a1e8f8", "name": "lib", "type": "tree"}]));
        let snippets: Page<Snippet> = page_of(json!([{"id": 7, "title": "test"}]));

        assert!(output_page(&users, false, |item| UserRow::from(item)).is_ok());
        assert!(output_page(&keys, false, |item| KeyRow::from(item)).is_ok());
        assert!(output_page(&tags, false, |item| TagRow::from(item)).is_ok());
        assert!(output_page(&entries, false, |item| TreeRow::from(item)).is_ok());
        assert!(output_page(&snippets, true, |item| SnippetRow::from(item)).is_ok());
    }

    #[test]
    fn test_tree_row_marks_directories() {
        let entry: TreeEntry =
            serde_json::from_value(json!({"id": "a1e8f8", "name": "lib", "type": "tree"})).unwrap();
        assert_eq!(TreeRow::from(&entry).name, "lib/");
    }
}
