//! Course catalog statistics command

use super::CommandContext;
use anyhow::Result;
use syllabus_core::CourseAnalytics;

/// Show the courses in the catalog
pub async fn courses_command(context: CommandContext) -> Result<()> {
    let rag_config = context.config_loader.load_rag_config().await?;
    let store = context.load_store(rag_config.max_results).await?;
    let analytics = CourseAnalytics::from_store(store.as_ref()).await;

    println!("📚 {} course(s)", analytics.total_courses);
    for title in &analytics.course_titles {
        println!("   • {}", title);
    }

    Ok(())
}
