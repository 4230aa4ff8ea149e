//! Admin pages. Layout chrome is shared with the public site; gated pages
//! additionally show the admin nav strip.

use maud::{Markup, html};

use crate::store::{Admin, Category, Post};

use super::{PageContext, layout};

fn admin_nav() -> Markup {
    html! {
        nav class="admin-nav" {
            a href="/admin/dashboard" { "Dashboard" }
            a href="/admin/posts" { "Posts" }
            a href="/admin/categories" { "Categories" }
            a href="/compose" { "Compose" }
            a href="/admin/logout" { "Log out" }
        }
    }
}

pub fn signup(ctx: &PageContext) -> Markup {
    layout(
        "Admin signup",
        ctx,
        html! {
            h1 { "Create an admin account" }
            form class="stacked" method="post" action="/admin/signup" {
                input type="text" name="name" placeholder="Name";
                input type="email" name="email" placeholder="Email";
                input type="password" name="password" placeholder="Password";
                button type="submit" { "Sign up" }
            }
        },
    )
}

pub fn login(ctx: &PageContext, error: Option<&str>) -> Markup {
    layout(
        "Admin login",
        ctx,
        html! {
            h1 { "Admin login" }
            @if let Some(error) = error {
                p class="error-msg" { (error) }
            }
            form class="stacked" method="post" action="/admin/login" {
                input type="email" name="email" placeholder="Email";
                input type="password" name="password" placeholder="Password";
                button type="submit" { "Log in" }
            }
        },
    )
}

pub fn dashboard(
    ctx: &PageContext,
    admin: &Admin,
    total_posts: i64,
    total_categories: usize,
    total_recent_posts: usize,
) -> Markup {
    layout(
        "Dashboard",
        ctx,
        html! {
            (admin_nav())
            h1 { "Welcome back, " (admin.name) }
            div class="stats" {
                div class="stat" {
                    span class="stat-label" { "Total posts" }
                    span class="stat-value" id="total-posts" { (total_posts) }
                }
                div class="stat" {
                    span class="stat-label" { "Categories in use" }
                    span class="stat-value" id="total-categories" { (total_categories) }
                }
                div class="stat" {
                    span class="stat-label" { "Recent posts" }
                    span class="stat-value" id="total-recent-posts" { (total_recent_posts) }
                }
            }
        },
    )
}

pub fn categories(ctx: &PageContext, categories: &[Category], error: Option<&str>) -> Markup {
    layout(
        "Categories",
        ctx,
        html! {
            (admin_nav())
            h1 { "Categories" }
            @if let Some(error) = error {
                p class="error-msg" { (error) }
            }
            form class="stacked" method="post" action="/admin/add-category" {
                input type="text" name="category" placeholder="New category";
                button type="submit" { "Add" }
            }
            @if categories.is_empty() {
                p class="notice" { "No categories yet." }
            } @else {
                table class="listing" {
                    tr { th { "Name" } th { "Added" } th {} }
                    @for category in categories {
                        tr {
                            td { (category.name) }
                            td { (category.created_at.format("%Y-%m-%d")) }
                            td {
                                form method="post"
                                    action={ "/admin/delete-category/" (category.name) } {
                                    button class="link" type="submit" {
                                        "Delete (removes its posts)"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn posts(ctx: &PageContext, posts: &[Post]) -> Markup {
    layout(
        "All posts",
        ctx,
        html! {
            (admin_nav())
            h1 { "All posts" }
            @if posts.is_empty() {
                p class="notice" { "No posts yet." }
            } @else {
                table class="listing" {
                    tr { th { "Title" } th { "Category" } th { "Created" } th {} th {} }
                    @for post in posts {
                        tr {
                            td { a href={ "/admin/post/" (post.id) } { (post.title) } }
                            td { (post.category) }
                            td { (post.created_at.format("%Y-%m-%d")) }
                            td { a href={ "/admin/edit-post/" (post.id) } { "Edit" } }
                            td {
                                form method="post" action={ "/admin/delete-post/" (post.id) } {
                                    button class="link" type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn recent_posts(ctx: &PageContext, posts: &[Post]) -> Markup {
    layout(
        "Recent posts",
        ctx,
        html! {
            (admin_nav())
            h1 { "Recent posts" }
            ul {
                @for post in posts {
                    li {
                        a href={ "/admin/post/" (post.id) } { (post.title) }
                        " — " (post.created_at.format("%Y-%m-%d %H:%M"))
                    }
                }
            }
        },
    )
}

pub fn post_detail(ctx: &PageContext, post: &Post) -> Markup {
    layout(
        &post.title,
        ctx,
        html! {
            (admin_nav())
            article {
                h1 { (post.title) }
                p class="meta" {
                    "Slug: " (post.link)
                    " · Category: " (post.category)
                    @if !post.tags.is_empty() { " · Tags: " (post.tags) }
                }
                @if let Some(image) = &post.image {
                    img src={ "/uploads/" (image) } alt=(post.title);
                }
                div class="post-body" { (maud::PreEscaped(post.body.as_str())) }
                p {
                    a href={ "/admin/edit-post/" (post.id) } { "Edit this post" }
                }
            }
        },
    )
}

pub fn compose(ctx: &PageContext, admin: &Admin) -> Markup {
    layout(
        "Compose",
        ctx,
        html! {
            (admin_nav())
            h1 { "Compose a post" }
            p class="meta" { "Publishing as " (admin.name) }
            form class="stacked" method="post" action="/compose" enctype="multipart/form-data" {
                input type="text" name="title" placeholder="Title";
                textarea name="content" rows="14" placeholder="Write in HTML" {}
                input type="text" name="tags" placeholder="Tags (comma separated)";
                input type="text" name="category" placeholder="Category";
                label {
                    "Illustration (optional) "
                    input type="file" name="image" accept="image/*";
                }
                button type="submit" { "Publish" }
            }
        },
    )
}

pub fn edit_post(ctx: &PageContext, post: &Post) -> Markup {
    layout(
        "Edit post",
        ctx,
        html! {
            (admin_nav())
            h1 { "Edit post" }
            form class="stacked" method="post" action={ "/admin/edit-post/" (post.id) } {
                input type="text" name="title" value=(post.title);
                input type="text" name="category" value=(post.category);
                textarea name="content" rows="14" { (post.body) }
                button type="submit" { "Save" }
            }
            p class="meta" { "Slug and illustration are fixed at creation." }
        },
    )
}

pub fn logout_confirm(ctx: &PageContext) -> Markup {
    layout(
        "Log out",
        ctx,
        html! {
            (admin_nav())
            h1 { "Log out" }
            form method="post" action="/admin/logout" {
                button type="submit" { "Log out" }
            }
        },
    )
}
