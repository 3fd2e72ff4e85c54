//! Built-in keyword lists and canned replies.
//!
//! These are the defaults used when the configuration does not provide its own
//! `[keywords]` table.  Matching is plain substring containment, so shorter
//! keywords match more messages.

/// Keywords that indicate a sensitive matter that must go to a human.
pub const DANGER_WORDS: &[&str] = &["自殺", "自殘", "想死", "不想活", "輕生", "家暴", "救命"];

/// Reply sent when a danger keyword matches.
pub const DANGER_REPLY: &str = "您的訊息涉及需要特別關心的內容，我們已通知專人盡快與您聯繫。\n如有立即危險，請撥打 110 或 119；\n需要傾訴可撥打 1925 安心專線（24 小時）。";

/// Keywords that indicate purchase intent.
pub const BUY_WORDS: &[&str] = &["購買", "訂購", "下單", "買", "報價", "訂單"];

/// Reply sent when a purchase keyword matches.
pub const BUY_REPLY: &str = "感謝您的訂購意願！專人將盡快與您聯繫，協助您完成購買。";

/// Common questions, checked in order after the danger and purchase lists.
pub const FAQ: &[(&[&str], &str)] = &[
    (&["營業時間", "幾點開", "幾點關"], "我們營業時間是9-18點"),
    (&["地址", "在哪", "怎麼去"], "我們的地址是台北市信義區市府路1號，歡迎蒞臨！"),
    (&["運費", "寄送", "配送", "出貨"], "全館滿 1000 元免運，訂單成立後 3 個工作天內出貨。"),
    (&["退貨", "退款", "換貨"], "商品到貨 7 天內可申請退換貨，請保持商品完整並附上發票。"),
    (&["付款", "刷卡", "轉帳"], "我們接受信用卡、ATM 轉帳與貨到付款。"),
];
