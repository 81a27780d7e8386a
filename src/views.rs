//! Server-rendered pages.
//!
//! Pages are plain HTML strings assembled here and nowhere else; handlers
//! pass data in and wrap the result in `axum::response::Html`. All
//! user-sourced text goes through `escape`.

use crate::db::models::{Grade, Lesson, Progress, Subject};
use crate::middleware::flash::Flash;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn flash_block(flashes: &[Flash]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"flashes\">\n");
    for flash in flashes {
        out.push_str(&format!(
            "  <li class=\"flash {}\">{}</li>\n",
            flash.category.as_str(),
            escape(&flash.message)
        ));
    }
    out.push_str("</ul>\n");
    out
}

fn nav(logged_in: bool) -> &'static str {
    if logged_in {
        "<nav><a href=\"/\">Home</a> <a href=\"/dashboard\">Dashboard</a> \
         <a href=\"/logout\">Log out</a></nav>\n"
    } else {
        "<nav><a href=\"/\">Home</a> <a href=\"/register\">Register</a> \
         <a href=\"/login\">Log in</a></nav>\n"
    }
}

fn layout(title: &str, logged_in: bool, flashes: &[Flash], body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Studyhall</title>\n</head>\n<body>\n{}{}{}\n</body>\n</html>\n",
        escape(title),
        nav(logged_in),
        flash_block(flashes),
        body
    )
}

pub fn index_page(flashes: &[Flash], logged_in: bool) -> String {
    layout(
        "Welcome",
        logged_in,
        flashes,
        "<h1>Welcome to Studyhall</h1>\n\
         <p>Register for an account, pick your grade, and work through your\n\
         subjects one lesson at a time.</p>\n",
    )
}

pub fn register_page(grades: &[Grade], csrf_token: &str, flashes: &[Flash]) -> String {
    let mut options = String::new();
    for grade in grades {
        options.push_str(&format!(
            "    <option value=\"{}\">{}</option>\n",
            grade.id,
            escape(&grade.name)
        ));
    }
    let body = format!(
        "<h1>Register</h1>\n\
         <form method=\"post\" action=\"/register\">\n\
         <input type=\"hidden\" name=\"csrf_token\" value=\"{}\">\n\
         <label>Name <input type=\"text\" name=\"name\"></label>\n\
         <label>Email <input type=\"text\" name=\"email\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <label>Grade\n  <select name=\"grade\">\n{}  </select>\n</label>\n\
         <button type=\"submit\">Register</button>\n\
         </form>\n",
        escape(csrf_token),
        options
    );
    layout("Register", false, flashes, &body)
}

pub fn login_page(csrf_token: &str, flashes: &[Flash]) -> String {
    let body = format!(
        "<h1>Log in</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <input type=\"hidden\" name=\"csrf_token\" value=\"{}\">\n\
         <label>Email <input type=\"text\" name=\"email\"></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Log in</button>\n\
         </form>\n",
        escape(csrf_token)
    );
    layout("Log in", false, flashes, &body)
}

pub fn dashboard_page(
    student_name: &str,
    groups: &[(Grade, Vec<Subject>)],
    flashes: &[Flash],
) -> String {
    let mut body = format!("<h1>Dashboard</h1>\n<p>Welcome back, {}.</p>\n", escape(student_name));
    for (grade, subjects) in groups {
        body.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape(&grade.name)));
        for subject in subjects {
            body.push_str(&format!(
                "  <li><a href=\"/subject/{}\">{}</a></li>\n",
                subject.id,
                escape(&subject.name)
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Dashboard", true, flashes, &body)
}

pub fn subject_page(
    subject: Option<&Subject>,
    rows: &[(Lesson, Option<Progress>)],
    flashes: &[Flash],
) -> String {
    let Some(subject) = subject else {
        return layout(
            "Subject",
            true,
            flashes,
            "<h1>Subject</h1>\n<p>No such subject.</p>\n",
        );
    };

    let mut body = format!("<h1>{}</h1>\n<ol class=\"lessons\">\n", escape(&subject.name));
    for (lesson, progress) in rows {
        let status = match progress {
            Some(p) if p.completed => match p.score {
                Some(score) => format!("completed (score {score})"),
                None => "completed".to_string(),
            },
            Some(p) if p.unlocked => "unlocked".to_string(),
            Some(_) => "locked".to_string(),
            None => "not started".to_string(),
        };
        body.push_str(&format!(
            "  <li value=\"{}\">{} <span class=\"status\">{}</span></li>\n",
            lesson.sort_order,
            escape(&lesson.title),
            escape(&status)
        ));
    }
    body.push_str("</ol>\n");
    layout(&subject.name, true, flashes, &body)
}
