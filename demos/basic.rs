//! Basic example demonstrating the GitLab API client.
//!
//! Run with:
//! ```
//! FOXKIT_PRIVATE_TOKEN=your-token cargo run --example basic -- gitlab-org/gitlab-ce
//! ```

use foxkit::{get_tags, Foxkit, Found, Get, List, Project, ProjectRef, RequestOptions, User, UserRef};

#[tokio::main]
async fn main() -> foxkit::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Defaults from FOXKIT_* environment variables
    let mut foxkit = Foxkit::new();
    foxkit.configure(|defaults| defaults.auto_paginate = Some(true));
    let client = foxkit.client()?;
    println!("Connected to: {}", client.api_endpoint());

    if client.is_authenticated() {
        let me = User::get(&client, UserRef::Current).await?;
        println!("Authenticated as {}", me.username);
    }

    // Look up a project without failing on 404
    let slug = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gitlab-org/gitlab-ce".to_string());
    let reference: ProjectRef = slug.parse()?;

    println!("\n--- Getting Project Details ---");
    let Some(body) = client
        .project(&reference, RequestOptions::new())
        .await
        .found()?
    else {
        println!("No project named {slug}");
        return Ok(());
    };
    let project: Project = serde_json::from_value(body)?;
    println!("Project: {}", project.name);
    println!("  ID: {}", project.id);
    println!("  Visibility: {}", project.visibility());
    println!("  Default branch: {}", project.default_branch.as_deref().unwrap_or("none"));

    // Every tag, across pages
    println!("\n--- Listing Tags ---");
    let tags = get_tags(&client, &project.reference()).await?;
    println!("Found {} tags", tags.len());
    for tag in tags.iter().take(5) {
        println!("  - {} {}", tag.name, tag.sha().unwrap_or(""));
    }

    // One page of users, with the server's pagination headers
    println!("\n--- Listing Users (first page) ---");
    let page = User::list_page(&client, &Default::default(), 1, 10).await?;
    println!("Found {} users (total: {:?})", page.len(), page.total);
    for user in &page {
        println!("  - {} ({})", user.username, user.id);
    }

    if let Some(last) = client.last_response() {
        println!("\nLast response: {} {}", last.status, last.url);
    }

    Ok(())
}
