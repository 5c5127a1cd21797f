//! HTML pages
//!
//! Every page shares one layout: navigation that depends on the logged-in
//! user, an optional flash banner, then the page body. User-supplied text is
//! always passed through [`escape`].

use std::fmt::Write;

use axum::{http::StatusCode, response::Html};
use chrono::{DateTime, Utc};

use crate::models::{
    book::{Book, NewBook},
    form::FormErrors,
    request::{NewRequest, Request},
    user::{LoginForm, NewUser, SessionUser},
};

/// Pages the handlers can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Home,
    About,
    ShowRequest,
    NewRequest,
    Signup,
    Login,
    ShowBook,
    NewBook,
    EditBook,
}

/// A form being displayed, possibly with errors from a failed submission
#[derive(Debug, Clone)]
pub enum FormView {
    Request(NewRequest),
    Signup(NewUser),
    Login(LoginForm),
    Book(NewBook),
}

/// Values available to every page
#[derive(Debug, Default)]
pub struct TemplateData {
    pub current_user: Option<SessionUser>,
    pub flash: Option<String>,
    pub announcement: Option<String>,
    pub requests: Vec<Request>,
    pub request: Option<Request>,
    pub books: Vec<Book>,
    pub book: Option<Book>,
    pub form: Option<FormView>,
}

pub fn render(template: Template, data: TemplateData) -> Html<String> {
    let (title, body) = match template {
        Template::Home => ("Home", home(&data)),
        Template::About => ("About", about()),
        Template::ShowRequest => match &data.request {
            Some(request) => ("Request", show_request(request)),
            None => ("Request", String::new()),
        },
        Template::NewRequest => {
            let form = match &data.form {
                Some(FormView::Request(form)) => form.clone(),
                _ => NewRequest::default(),
            };
            ("New request", new_request(&form))
        }
        Template::Signup => {
            let form = match &data.form {
                Some(FormView::Signup(form)) => form.clone(),
                _ => NewUser::default(),
            };
            ("Sign up", signup(&form))
        }
        Template::Login => {
            let form = match &data.form {
                Some(FormView::Login(form)) => form.clone(),
                _ => LoginForm::default(),
            };
            ("Log in", login(&form))
        }
        Template::ShowBook => match &data.book {
            Some(book) => ("Book", show_book(book)),
            None => ("Book", String::new()),
        },
        Template::NewBook | Template::EditBook => {
            let form = match &data.form {
                Some(FormView::Book(form)) => form.clone(),
                _ => NewBook::default(),
            };
            let editing = template == Template::EditBook;
            (
                if editing { "Edit book" } else { "Upload book" },
                book_form(&form, editing),
            )
        }
    };

    Html(layout(title, data.current_user.as_ref(), data.flash.as_deref(), &body))
}

/// Bare error page; only the status text is shown
pub fn render_error(status: StatusCode) -> Html<String> {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h2>{} {}</h2>\n<p><a href=\"/\">Back to the home page</a></p>\n",
        status.as_u16(),
        reason
    );
    Html(layout(reason, None, None, &body))
}

/// Escape text for HTML element and attribute content
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

fn human_date(t: &DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

fn layout(title: &str, user: Option<&SessionUser>, flash: Option<&str>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Book Requests</title>\n</head>\n<body>\n<header>\n\
         <h1><a href=\"/\">Book Requests</a></h1>\n</header>\n<nav>\n\
         <a href=\"/\">Home</a>\n<a href=\"/request/new\">New request</a>\n\
         <a href=\"/book/new\">Upload book</a>\n<a href=\"/about\">About</a>\n",
        escape(title)
    );

    match user {
        Some(user) => {
            let _ = write!(
                html,
                "<form action=\"/user/logout\" method=\"POST\">\
                 <button>Logout ({})</button></form>\n",
                escape(&user.username)
            );
        }
        None => {
            html.push_str("<a href=\"/user/signup\">Signup</a>\n<a href=\"/user/login\">Login</a>\n");
        }
    }
    html.push_str("</nav>\n<main>\n");

    if let Some(flash) = flash {
        let _ = writeln!(html, "<div class=\"flash\">{}</div>", escape(flash));
    }

    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn home(data: &TemplateData) -> String {
    let mut html = String::new();

    if let Some(announcement) = &data.announcement {
        let _ = writeln!(html, "<div class=\"announcement\">{}</div>", escape(announcement));
    }

    html.push_str("<h2>Latest requests</h2>\n");
    if data.requests.is_empty() {
        html.push_str("<p>There's nothing to see here yet!</p>\n");
    } else {
        html.push_str("<table>\n<tr><th>Title</th><th>Requester</th><th>Created</th><th>ID</th></tr>\n");
        for request in &data.requests {
            let _ = writeln!(
                html,
                "<tr><td><a href=\"/request/{id}\">{}</a></td><td>{}</td><td>{}</td><td>#{id}</td></tr>",
                escape(&request.title),
                escape(&request.requester),
                human_date(&request.created),
                id = request.id,
            );
        }
        html.push_str("</table>\n");
    }

    html.push_str("<h2>Latest books</h2>\n");
    if data.books.is_empty() {
        html.push_str("<p>No books have been uploaded yet.</p>\n");
    } else {
        html.push_str("<table>\n<tr><th>Title</th><th>Authors</th><th>Downloads</th></tr>\n");
        for book in &data.books {
            let _ = writeln!(
                html,
                "<tr><td><a href=\"/book/{}\">{}</a></td><td>{}</td><td>{}</td></tr>",
                escape(&book.volume_id),
                escape(&book.title),
                escape(&book.authors),
                book.downloads,
            );
        }
        html.push_str("</table>\n");
    }

    html
}

fn about() -> String {
    "<h2>About</h2>\n\
     <p>Ask the community for a book you are looking for, or share one with everybody.</p>\n\
     <p>Anyone can browse requests and books. Sign up and log in to make a request \
     or upload a book.</p>\n"
        .to_string()
}

fn show_request(request: &Request) -> String {
    format!(
        "<div class=\"request\">\n<div class=\"metadata\"><strong>{}</strong> <span>#{}</span></div>\n\
         <p>Requested by {}</p>\n<div class=\"metadata\"><time>Created: {}</time></div>\n</div>\n",
        escape(&request.title),
        request.id,
        escape(&request.requester),
        human_date(&request.created),
    )
}

fn field_error(errors: &FormErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| format!("<label class=\"error\">{}</label>\n", escape(message)))
        .unwrap_or_default()
}

fn text_input(errors: &FormErrors, label: &str, name: &str, kind: &str, value: &str) -> String {
    format!(
        "<div>\n<label>{}:</label>\n{}<input type=\"{}\" name=\"{}\" value=\"{}\">\n</div>\n",
        escape(label),
        field_error(errors, name),
        kind,
        name,
        escape(value),
    )
}

fn new_request(form: &NewRequest) -> String {
    let mut html = String::from("<form action=\"/request/new\" method=\"POST\">\n");
    html.push_str(&text_input(&form.errors, "Title", "title", "text", &form.title));
    html.push_str("<div><input type=\"submit\" value=\"Submit request\"></div>\n</form>\n");
    html
}

fn signup(form: &NewUser) -> String {
    let mut html = String::from("<form action=\"/user/signup\" method=\"POST\">\n");
    html.push_str(&text_input(&form.errors, "Username", "username", "text", &form.username));
    html.push_str(&text_input(&form.errors, "Email", "email", "email", &form.email));
    html.push_str(&text_input(&form.errors, "Password", "password", "password", ""));
    html.push_str("<div><input type=\"submit\" value=\"Signup\"></div>\n</form>\n");
    html
}

fn login(form: &LoginForm) -> String {
    let errors = FormErrors::default();
    let mut html = String::from("<form action=\"/user/login\" method=\"POST\">\n");
    html.push_str(&text_input(&errors, "Username", "username", "text", &form.username));
    html.push_str(&text_input(&errors, "Password", "password", "password", ""));
    html.push_str("<div><input type=\"submit\" value=\"Login\"></div>\n</form>\n");
    html
}

fn show_book(book: &Book) -> String {
    let mut html = String::from("<div class=\"book\">\n");

    if !book.image_link.is_empty() {
        let _ = writeln!(
            html,
            "<img src=\"{}\" alt=\"Cover of {}\">",
            escape(&book.image_link),
            escape(&book.title)
        );
    }
    let _ = writeln!(html, "<h2>{}</h2>", escape(&book.title));
    if !book.subtitle.is_empty() {
        let _ = writeln!(html, "<h3>{}</h3>", escape(&book.subtitle));
    }

    html.push_str("<dl>\n");
    for (label, value) in [
        ("Authors", book.authors.clone()),
        ("Publisher", book.publisher.clone()),
        ("Published", book.published_date.clone()),
        ("Pages", book.page_count.to_string()),
        ("Categories", book.categories.clone()),
        ("Maturity rating", book.maturity_rating.clone()),
        ("Price", book.price.to_string()),
        ("ISBN-10", book.isbn10.clone()),
        ("ISBN-13", book.isbn13.clone()),
        ("Uploaded by", book.uploader.clone()),
        ("Added", human_date(&book.created)),
        ("Downloads", book.downloads.to_string()),
    ] {
        if !value.is_empty() {
            let _ = writeln!(html, "<dt>{}</dt><dd>{}</dd>", label, escape(&value));
        }
    }
    html.push_str("</dl>\n");

    if !book.description.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape(&book.description));
    }

    let volume_id = escape(&book.volume_id);
    let _ = write!(
        html,
        "<form action=\"/book/{volume_id}/download\" method=\"POST\">\
         <button>Download</button></form>\n\
         <a href=\"/book/{volume_id}/edit\">Edit</a>\n</div>\n"
    );
    html
}

fn book_form(form: &NewBook, editing: bool) -> String {
    let mut html = if editing {
        format!(
            "<form action=\"/book/{}/edit\" method=\"POST\">\n\
             <div><label>Volume ID:</label> <span>{}</span></div>\n",
            escape(&form.volume_id),
            escape(&form.volume_id)
        )
    } else {
        let mut html = String::from("<form action=\"/book/new\" method=\"POST\">\n");
        html.push_str(&text_input(&form.errors, "Volume ID", "volume_id", "text", &form.volume_id));
        html
    };

    let e = &form.errors;
    html.push_str(&text_input(e, "Title", "title", "text", &form.title));
    html.push_str(&text_input(e, "Subtitle", "subtitle", "text", &form.subtitle));
    html.push_str(&text_input(e, "Authors", "authors", "text", &form.authors));
    html.push_str(&text_input(e, "Publisher", "publisher", "text", &form.publisher));
    html.push_str(&text_input(e, "Published date", "published_date", "text", &form.published_date));
    html.push_str(&text_input(e, "Page count", "page_count", "text", &form.page_count));
    html.push_str(&text_input(e, "Categories", "categories", "text", &form.categories));
    html.push_str(&text_input(e, "Maturity rating", "maturity_rating", "text", &form.maturity_rating));
    html.push_str(&text_input(e, "Price", "price", "text", &form.price));
    html.push_str(&text_input(e, "ISBN-10", "isbn10", "text", &form.isbn10));
    html.push_str(&text_input(e, "ISBN-13", "isbn13", "text", &form.isbn13));
    html.push_str(&text_input(e, "Image link", "image_link", "url", &form.image_link));
    let _ = write!(
        html,
        "<div>\n<label>Description:</label>\n{}<textarea name=\"description\">{}</textarea>\n</div>\n",
        field_error(e, "description"),
        escape(&form.description)
    );
    let _ = write!(
        html,
        "<div><input type=\"submit\" value=\"{}\"></div>\n</form>\n",
        if editing { "Save changes" } else { "Upload book" }
    );
    html
}
