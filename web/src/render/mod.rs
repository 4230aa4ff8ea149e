//! maud views. Everything dynamic is escaped by maud; the one exception is
//! the post body, which is sanitized with ammonia before it is stored and
//! rendered pre-escaped here.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::App;
use crate::store::Post;

pub mod admin;
pub mod email;
pub mod site;

pub const SITE_NAME: &str = "Lantern";

/// Data every rendered page carries, loaded before the handler's own work.
pub struct PageContext {
    pub recent_posts: Vec<Post>,
}

impl PageContext {
    pub const RECENT_LIMIT: i64 = 4;

    pub async fn load(app: &App) -> Self {
        // a store hiccup degrades the page to an empty recent list instead
        // of failing it
        let recent_posts = match app.store.recent_posts(Self::RECENT_LIMIT).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load recent posts");
                Vec::new()
            }
        };
        Self { recent_posts }
    }
}

pub(crate) fn layout(title: &str, ctx: &PageContext, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " — " (SITE_NAME) }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                header class="site-header" {
                    a class="brand" href="/" { (SITE_NAME) }
                    nav {
                        a href="/" { "Home" }
                        a href="/about" { "About" }
                        a href="/weather" { "Weather" }
                        a href="/contact" { "Contact" }
                    }
                }
                main { (content) }
                footer class="site-footer" {
                    @if !ctx.recent_posts.is_empty() {
                        section class="recent" {
                            h2 { "Recent posts" }
                            ul {
                                @for post in &ctx.recent_posts {
                                    li {
                                        a href={ "/posts/" (post.link) } { (post.title) }
                                    }
                                }
                            }
                        }
                    }
                    section class="subscribe" {
                        h2 { "Subscribe" }
                        form method="post" action="/subscribe" {
                            input type="text" name="name" placeholder="Your name";
                            input type="email" name="email" placeholder="you@example.com";
                            button type="submit" { "Subscribe" }
                        }
                    }
                }
            }
        }
    }
}

const PAGE_CSS: &str = r#"
:root{--fg:#1c1b1a;--fg2:#5f5b56;--bg:#faf9f7;--accent:#b4552d;--border:#e4e0da}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:Georgia,serif;color:var(--fg);background:var(--bg);line-height:1.6}
.site-header{display:flex;align-items:baseline;gap:1.5rem;padding:1rem 1.5rem;border-bottom:1px solid var(--border)}
.brand{font-size:1.4rem;font-weight:700;color:var(--fg);text-decoration:none}
.site-header nav{display:flex;gap:1rem}
.site-header nav a{color:var(--fg2);text-decoration:none}
.site-header nav a:hover{color:var(--accent)}
main{max-width:46rem;margin:0 auto;padding:1.5rem}
main h1{margin-bottom:.75rem}
article.card{padding:1rem 0;border-bottom:1px solid var(--border)}
article.card h2 a{color:var(--fg);text-decoration:none}
article.card h2 a:hover{color:var(--accent)}
.meta{font-size:.85rem;color:var(--fg2)}
.post-body img,article img{max-width:100%}
.error-msg{color:#a02c2c;margin:.5rem 0}
.notice{color:var(--fg2);margin:.5rem 0}
form.stacked{display:flex;flex-direction:column;gap:.6rem;max-width:24rem}
form.stacked input,form.stacked textarea,form.stacked select{padding:.45rem;border:1px solid var(--border);font:inherit}
button{padding:.45rem .9rem;border:none;background:var(--accent);color:#fff;cursor:pointer}
button.link{background:none;color:var(--accent);padding:0;text-decoration:underline}
.site-footer{border-top:1px solid var(--border);margin-top:2rem;padding:1.5rem;display:flex;gap:3rem;flex-wrap:wrap}
.site-footer h2{font-size:1rem}
.site-footer ul{list-style:none}
.site-footer form{display:flex;gap:.4rem;flex-wrap:wrap}
.site-footer input{padding:.35rem;border:1px solid var(--border)}
table.listing{width:100%;border-collapse:collapse}
table.listing th,table.listing td{text-align:left;padding:.4rem;border-bottom:1px solid var(--border)}
.stats{display:flex;gap:1.5rem;margin:1rem 0}
.stat{border:1px solid var(--border);padding:.8rem 1.2rem}
.stat-label{display:block;font-size:.8rem;color:var(--fg2)}
.stat-value{font-size:1.6rem;font-weight:700}
.pager{display:flex;gap:1rem;margin-top:1rem}
.admin-nav{display:flex;gap:1rem;margin-bottom:1rem;font-size:.9rem}
.admin-nav a{color:var(--fg2)}
"#;
