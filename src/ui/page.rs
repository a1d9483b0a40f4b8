//! Document shell and marketing sections.

use std::fmt::Write;

use super::escape;

const TITLE: &str = "SoftSell | Turn Unused Software Licenses Into Cash";
const DESCRIPTION: &str = "SoftSell helps businesses sell their unused software licenses securely and easily. Get instant valuations and quick payments for enterprise software licenses.";
const SOCIAL_DESCRIPTION: &str = "Convert unused software licenses into immediate revenue with SoftSell's secure and transparent platform.";
const CANONICAL_URL: &str = "https://softsell.com";

/// In-page navigation targets, in header order.
pub const NAV_SECTIONS: [(&str, &str); 4] = [
    ("how-it-works", "How It Works"),
    ("why-choose-us", "Why Choose Us"),
    ("testimonials", "Testimonials"),
    ("contact", "Contact"),
];

/// A step of the selling process.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Heading.
    pub title: &'static str,
    /// Body copy.
    pub text: &'static str,
}

/// A selling point.
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    /// Heading.
    pub title: &'static str,
    /// Body copy.
    pub text: &'static str,
    /// Accent colour modifier.
    pub accent: &'static str,
}

/// A customer quote.
#[derive(Debug, Clone, Copy)]
pub struct Testimonial {
    /// Customer name.
    pub name: &'static str,
    /// Job title.
    pub role: &'static str,
    /// Employer.
    pub company: &'static str,
    /// Quote.
    pub text: &'static str,
}

impl Testimonial {
    /// Initials shown in the avatar.
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

pub const STEPS: [Step; 3] = [
    Step {
        title: "1. Upload License",
        text: "Securely upload your license information using our encrypted portal. We support most major software vendors.",
    },
    Step {
        title: "2. Get Valuation",
        text: "Receive a competitive market-based valuation for your unused licenses with a detailed breakdown of pricing factors.",
    },
    Step {
        title: "3. Get Paid",
        text: "Accept the offer and receive payment within 2 business days via bank transfer, PayPal, or cryptocurrency.",
    },
];

pub const FEATURES: [Feature; 4] = [
    Feature {
        title: "Secure Transactions",
        text: "Bank-level encryption and secure transfer protocols for all license transfers.",
        accent: "green",
    },
    Feature {
        title: "Fast Payouts",
        text: "Get paid within 2 business days of acceptance with multiple payment options.",
        accent: "purple",
    },
    Feature {
        title: "Transparent Valuation",
        text: "Clear breakdown of license valuation factors with market-based pricing.",
        accent: "blue",
    },
    Feature {
        title: "24/7 Support",
        text: "Expert assistance available around the clock via chat, email, or phone.",
        accent: "yellow",
    },
];

pub const TESTIMONIALS: [Testimonial; 3] = [
    Testimonial {
        name: "Sarah Johnson",
        role: "IT Director",
        company: "TechFlow Inc.",
        text: "SoftSell helped us recover over $45,000 from unused enterprise licenses. The process was secure and seamless!",
    },
    Testimonial {
        name: "Michael Chang",
        role: "CTO",
        company: "Databridge Solutions",
        text: "We were skeptical at first, but SoftSell's transparent valuation process and quick payments won us over. Highly recommend!",
    },
    Testimonial {
        name: "Emma Rodriguez",
        role: "Operations Manager",
        company: "Vertex Systems",
        text: "Converting our unused licenses into capital helped fund our new IT initiatives. SoftSell made it incredibly easy.",
    },
];

/// Assemble the full document around pre-rendered fragments.
#[must_use]
pub fn render_index(chat_widget: &str, contact_section: &str, year: i32) -> String {
    let mut body = String::new();
    body.push_str(&header());
    body.push_str("<main>");
    body.push_str(HERO);
    body.push_str(&how_it_works());
    body.push_str(&why_choose_us());
    body.push_str(&testimonials());
    body.push_str(contact_section);
    body.push_str("</main>");
    body.push_str(&footer(year));
    body.push_str(chat_widget);
    html_shell(&body)
}

/// Wrap `body` in the document head.
fn html_shell(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{TITLE}</title>
    <meta name="description" content="{DESCRIPTION}">
    <meta name="keywords" content="software licenses, sell licenses, software resale, enterprise software, license valuation">
    <meta property="og:title" content="{TITLE}">
    <meta property="og:description" content="{social}">
    <meta property="og:type" content="website">
    <meta property="og:url" content="{CANONICAL_URL}">
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{TITLE}">
    <meta name="twitter:description" content="{social}">
    <link rel="canonical" href="{CANONICAL_URL}">

    <!-- Local assets only (no CDN) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script defer src="/static/app.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
{body}
</body>
</html>"#,
        social = escape(SOCIAL_DESCRIPTION),
    )
}

fn header() -> String {
    let mut links = String::new();
    for (id, label) in NAV_SECTIONS {
        let _ = write!(links, r##"<a href="#{id}" class="nav__link">{label}</a>"##);
    }
    format!(
        r##"<header class="site-header">
<nav class="container nav">
<a href="#" class="brand"><span class="brand__logo">SS</span><span class="brand__name">SoftSell</span></a>
<div class="nav__links">{links}</div>
<div class="nav__actions">
<button type="button" class="icon-button" data-theme-toggle aria-label="Toggle dark mode"><span class="theme-icon"></span></button>
<details class="nav__mobile"><summary aria-label="Toggle navigation menu"><span class="burger"></span></summary><div class="nav__mobile-links">{links}</div></details>
</div>
</nav>
</header>"##
    )
}

const HERO: &str = r##"<section class="hero">
<div class="container hero__grid">
<div class="hero__copy">
<div class="pill">Trusted by organizations worldwide</div>
<h1>Turn Unused Software Into <span class="hero__accent">Instant Cash</span></h1>
<p class="hero__lead">SoftSell helps you sell unused software licenses securely and easily.</p>
<div class="hero__stats">
<div><div class="stat__value">$4.2M+</div><div class="stat__label">Recovered Value</div></div>
<div><div class="stat__value">12,000+</div><div class="stat__label">Licenses Sold</div></div>
<div><div class="stat__value">98%</div><div class="stat__label">Satisfaction Rate</div></div>
</div>
<a href="#contact" class="button button--light">Sell My Licenses</a>
</div>
<div class="hero__card">
<h3>Get a Quote</h3>
<p>Tell us what you have and receive a valuation within 24 hours.</p>
<a href="#contact" class="button button--primary button--block">Get a Quote</a>
</div>
</div>
</section>"##;

fn how_it_works() -> String {
    let mut cards = String::new();
    for step in STEPS {
        let _ = write!(
            cards,
            r#"<article class="card card--step"><h3>{}</h3><p>{}</p></article>"#,
            step.title, step.text
        );
    }
    format!(
        r#"<section id="how-it-works" class="section">
<div class="container">
<h2 class="section__title">How It Works</h2>
<p class="section__lead">Our streamlined process makes it easy to convert your unused licenses into cash in just three simple steps.</p>
<div class="grid grid--3">{cards}</div>
</div>
</section>"#
    )
}

fn why_choose_us() -> String {
    let mut cards = String::new();
    for feature in FEATURES {
        let _ = write!(
            cards,
            r#"<article class="card card--feature card--{}"><h3>{}</h3><p>{}</p></article>"#,
            feature.accent, feature.title, feature.text
        );
    }
    format!(
        r#"<section id="why-choose-us" class="section section--alt">
<div class="container">
<h2 class="section__title">Why Choose Us</h2>
<p class="section__lead">SoftSell is the leading platform for businesses looking to recover value from their unused software investments.</p>
<div class="grid grid--4">{cards}</div>
</div>
</section>"#
    )
}

fn testimonials() -> String {
    let mut cards = String::new();
    for t in TESTIMONIALS {
        let _ = write!(
            cards,
            r#"<figure class="card card--testimonial"><blockquote>{text}</blockquote><figcaption><span class="avatar">{initials}</span><span><strong>{name}</strong><br><small>{role}, {company}</small></span></figcaption></figure>"#,
            text = escape(t.text),
            initials = t.initials(),
            name = t.name,
            role = t.role,
            company = t.company,
        );
    }
    format!(
        r#"<section id="testimonials" class="section">
<div class="container">
<h2 class="section__title">What Our Customers Say</h2>
<p class="section__lead">Companies of all sizes trust SoftSell to handle their software license sales.</p>
<div class="grid grid--3">{cards}</div>
</div>
</section>"#
    )
}

fn footer(year: i32) -> String {
    let mut links = String::new();
    for (id, label) in NAV_SECTIONS {
        let _ = write!(links, r##"<li><a href="#{id}">{label}</a></li>"##);
    }
    format!(
        r#"<footer class="site-footer">
<div class="container grid grid--3">
<div><h3 class="brand__name">SoftSell</h3><p>Turn unused software into instant cash.</p></div>
<div><h4>Quick Links</h4><ul>{links}</ul></div>
<div><h4>Contact Us</h4><p>hello@softsell.com</p><p>1-800-SOFT-SELL</p></div>
</div>
<p class="site-footer__legal">&copy; {year} SoftSell. All rights reserved.</p>
</footer>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_contains_every_section_once() {
        let html = render_index("<div id=\"chat-widget\"></div>", "<section id=\"contact\"></section>", 2026);
        for (id, _) in NAV_SECTIONS {
            assert_eq!(
                html.matches(&format!(r#"id="{id}""#)).count(),
                1,
                "section {id}"
            );
        }
        assert_eq!(html.matches(r#"id="chat-widget""#).count(), 1);
    }

    #[test]
    fn test_head_carries_seo_tags() {
        let html = render_index("", "", 2026);
        assert!(html.contains("<title>SoftSell | Turn Unused Software Licenses Into Cash</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://softsell.com">"#));
        assert!(html.contains(r#"property="og:description""#));
        assert!(html.contains("SoftSell&#x27;s secure"));
    }

    #[test]
    fn test_footer_year_and_contacts() {
        let html = render_index("", "", 2031);
        assert!(html.contains("&copy; 2031 SoftSell."));
        assert!(html.contains("1-800-SOFT-SELL"));
    }

    #[test]
    fn test_testimonial_initials() {
        assert_eq!(TESTIMONIALS[2].initials(), "ER");
    }
}
