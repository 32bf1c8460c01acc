//! # Course Pages
//!
//! Server-rendered course detail page. Each course field lands in a fixed
//! element id; text is escaped, `description` is trusted catalog HTML.

use pay_core::Course;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text_node(value: Option<&str>) -> String {
    escape_html(value.unwrap_or(""))
}

/// Render the course detail page
pub fn course_detail(course: &Course) -> String {
    let price = course.price.map(|p| p.display());
    let image = course
        .image_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<img id="course-image" src="{}" alt="{}">"#,
                escape_html(url),
                escape_html(&course.title)
            )
        })
        .unwrap_or_else(|| r#"<img id="course-image" alt="" hidden>"#.to_string());

    let syllabus: String = course
        .syllabus
        .iter()
        .map(|topic| format!("<li>{}</li>", escape_html(topic)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body style="font-family: system-ui; max-width: 760px; margin: 40px auto; color: #1a1a2e;">
    {image}
    <h1 id="course-title">{title}</h1>
    <h2 id="course-subtitle">{subtitle}</h2>
    <p>Instructor: <span id="course-instructor">{instructor}</span></p>
    <p>Duration: <span id="course-duration">{duration}</span></p>
    <p>Level: <span id="course-level">{level}</span></p>
    <p>Price: <span id="course-price">{price}</span></p>
    <div id="course-description">{description}</div>
    <ul id="course-syllabus">{syllabus}</ul>
</body>
</html>
"#,
        title = escape_html(&course.title),
        subtitle = text_node(course.subtitle.as_deref()),
        instructor = text_node(course.instructor.as_deref()),
        duration = text_node(course.duration.as_deref()),
        level = text_node(course.level.as_deref()),
        price = text_node(price.as_deref()),
        description = course.description,
        image = image,
        syllabus = syllabus,
    )
}

/// Render the "course not found" page
pub fn course_not_found(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Course not found</title></head>
<body style="font-family: system-ui; max-width: 760px; margin: 40px auto;">
    <h1 id="course-title">Course not found</h1>
    <p style="color: #666;">{}</p>
</body>
</html>
"#,
        escape_html(message)
    )
}
