//! Message templates sent to users.

use database::User;

/// Welcome message shown by /start and the main menu.
pub const WELCOME: &str = "📸 *LinkedIn Image Downloader Bot*\n\n\
Send me a LinkedIn post URL and I'll download all images for you!\n\n\
✨ *How to use:*\n\
1. Copy a LinkedIn post URL\n\
2. Paste it here\n\
3. Get all images in high quality\n\n\
💡 *Daily limit:* 5 downloads\n\
🚀 *Premium:* Unlimited downloads (coming soon)";

/// Static help text for /help and the Help button.
pub const HELP: &str = "❓ *Help & Usage*\n\n\
1. *Find a LinkedIn post* with images\n\
2. *Copy the post URL* from your browser\n\
3. *Paste it here* and send\n\
4. *Wait* for the bot to process\n\
5. *Receive* all images in your chat!\n\n\
⚠️ *Limitations:*\n\
• Only public posts work\n\
• Maximum 5 downloads per day\n\
• Some posts may have no extractable images\n\n\
💡 *Tips:*\n\
• Make sure the post is public\n\
• Wait for images to load in your browser before copying URL\n\
• Try again if it fails the first time";

/// Reply when the daily quota is exhausted.
pub const LIMIT_REACHED: &str = "❌ You've reached your daily limit of 5 downloads!\n\n\
Come back tomorrow or wait for premium features! 🚀";

/// Reply to text that does not look like a LinkedIn post URL.
pub const INVALID_URL: &str = "❌ Please send a valid LinkedIn post URL!\n\n\
Example: https://www.linkedin.com/posts/...";

/// Status message sent before the browser starts working.
pub const PROCESSING: &str = "🔍 Processing your LinkedIn post...\n\n\
This may take 15-30 seconds...";

/// Status edit when extraction produced nothing.
pub const NO_IMAGES: &str = "❌ No images found in this LinkedIn post!\n\n\
💡 *Possible reasons:*\n\
• Post has no images\n\
• Post is private/restricted\n\
• Images failed to load\n\n\
Try with a different public post!";

/// Reply when the user record cannot be loaded or created.
pub const ACCOUNT_ERROR: &str = "❌ Error creating user account. Please try again later.";

/// Stats card fallback when the store is unreachable.
pub const STATS_ERROR: &str = "❌ Error retrieving your stats. Please try again.";

/// Summary when every media send failed.
pub const ALL_SENDS_FAILED: &str = "❌ Failed to send any images. \
The images might be too large or have restricted access.";

/// Status edit once candidates are known.
pub fn found_images(count: usize) -> String {
    format!(
        "✅ Found {} images!\n\nDownloading and sending them now...",
        count
    )
}

/// Caption for the image at 1-based position `index` of `total`.
pub fn photo_caption(index: usize, total: usize) -> String {
    format!("🖼️ Image {}/{}", index, total)
}

/// Plain-text fallback when a media send fails.
pub fn photo_fallback(index: usize, url: &str) -> String {
    format!("📎 Image {} (direct link):\n{}", index, url)
}

/// Completion summary with counters and remaining quota.
pub fn completion_summary(sent: u32, failed: u32, remaining: i64) -> String {
    let mut summary = format!(
        "🎉 Download complete!\n\n✅ Successfully sent {} images",
        sent
    );
    if failed > 0 {
        summary.push_str(&format!("\n⚠️ {} images failed to send", failed));
    }
    summary.push_str(&format!("\n📊 You have {} downloads left today", remaining));
    summary
}

/// The in-place stats card for the My Stats button.
pub fn stats_card(user: &User, used_today: i64, limit: i64) -> String {
    let name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let joined = user.created_at.get(..10).unwrap_or(&user.created_at);

    format!(
        "📊 *Your Stats*\n\n\
         🆔 User ID: `{}`\n\
         📝 Name: {}\n\
         📅 Joined: {}\n\
         🔥 Today's Downloads: {}/{}\n\
         ⭐ Premium: {}",
        user.telegram_id,
        name,
        joined,
        used_today,
        limit,
        if user.is_premium { "Yes" } else { "No" },
    )
}
