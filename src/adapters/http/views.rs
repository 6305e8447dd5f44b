//! Server-rendered page markup.

use std::fmt::Write;

use crate::domain::file::BlobEntry;
use crate::domain::foundation::Session;
use crate::domain::movie::{Movie, MovieDraft};
use crate::ports::{Notice, NoticeLevel};

/// Everything shown on the page.
#[derive(Debug, Default)]
pub struct PageView {
    pub session: Option<Session>,
    pub email_draft: String,
    pub movie_draft: MovieDraft,
    pub rename_draft: String,
    pub movies: Vec<Movie>,
    pub files: Vec<BlobEntry>,
    pub notices: Vec<Notice>,
}

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
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

pub fn render_page(view: &PageView) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Fireform</title>\n</head>\n<body>\n",
    );

    render_notices(&mut html, &view.notices);
    render_auth(&mut html, view);
    render_movie_form(&mut html, &view.movie_draft);
    render_movies(&mut html, &view.movies, &view.rename_draft);
    render_files(&mut html, &view.files);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_notices(html: &mut String, notices: &[Notice]) {
    for notice in notices {
        let class = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Failure => "failure",
            NoticeLevel::Info => "info",
        };
        let _ = writeln!(
            html,
            "<div class=\"notice {}\" role=\"alert\">{}</div>",
            class,
            escape(&notice.message)
        );
    }
}

fn render_auth(html: &mut String, view: &PageView) {
    html.push_str("<section id=\"auth\">\n");
    match &view.session {
        Some(session) => {
            let _ = writeln!(html, "<p>Signed in as {}</p>", escape(session.label()));
        }
        None => html.push_str("<p>Not signed in</p>\n"),
    }
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/auth/register\">\
         <input name=\"email\" placeholder=\"Email...\" value=\"{}\">\
         <input name=\"password\" type=\"password\" placeholder=\"Password...\">\
         <button type=\"submit\">Sign Up</button></form>",
        escape(&view.email_draft)
    );
    html.push_str(
        "<form method=\"post\" action=\"/auth/google\">\
         <button type=\"submit\">Sign In With Google</button></form>\n\
         <form method=\"post\" action=\"/auth/logout\">\
         <button type=\"submit\">Logout</button></form>\n</section>\n",
    );
}

fn render_movie_form(html: &mut String, draft: &MovieDraft) {
    let _ = writeln!(
        html,
        "<section id=\"new-movie\"><form method=\"post\" action=\"/movies\">\
         <input name=\"title\" placeholder=\"Movie title...\" value=\"{}\">\
         <input name=\"releaseDate\" type=\"number\" placeholder=\"Release Date...\" value=\"{}\">\
         <label><input name=\"receivedAnOscar\" type=\"checkbox\"{}> Received an Oscar</label>\
         <button type=\"submit\">Submit Movie</button></form></section>",
        escape(&draft.title),
        draft.release_date,
        if draft.received_award { " checked" } else { "" }
    );
}

fn render_movies(html: &mut String, movies: &[Movie], rename_draft: &str) {
    html.push_str("<section id=\"movies\">\n");
    for movie in movies {
        let id = escape(movie.id.as_str());
        let color = if movie.received_award { "green" } else { "red" };
        let _ = writeln!(
            html,
            "<div class=\"movie\"><h2 style=\"color: {}\">{}</h2>\
             <p>Date: {}</p>\
             <form method=\"post\" action=\"/movies/{}/delete\">\
             <button type=\"submit\">Delete Movie</button></form>\
             <form method=\"post\" action=\"/movies/{}/title\">\
             <input name=\"title\" placeholder=\"new title...\" value=\"{}\">\
             <button type=\"submit\">Update Title</button></form></div>",
            color,
            escape(&movie.title),
            movie.release_date,
            id,
            id,
            escape(rename_draft)
        );
    }
    html.push_str("</section>\n");
}

fn render_files(html: &mut String, files: &[BlobEntry]) {
    html.push_str(
        "<section id=\"files\">\n\
         <form method=\"post\" action=\"/files\" enctype=\"multipart/form-data\">\
         <input name=\"file\" type=\"file\">\
         <button type=\"submit\">Upload File</button></form>\n<ul>\n",
    );
    for file in files {
        let name = escape(&file.name);
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a>\
             <form method=\"post\" action=\"/files/delete\">\
             <input type=\"hidden\" name=\"name\" value=\"{}\">\
             <button type=\"submit\">Delete</button></form></li>",
            escape(&file.download_url),
            name,
            name
        );
    }
    html.push_str("</ul>\n</section>\n");
}
