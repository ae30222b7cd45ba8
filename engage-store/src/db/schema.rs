/// SQL schema for the Engage database
/// Creates the normalized tables with proper constraints, foreign keys, and indexes,
/// the staging table for flat source rows, and the reporting views
pub const SCHEMA: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT UNIQUE NOT NULL,
    email TEXT UNIQUE NOT NULL
);

-- Posts table
-- likes_count is written only by the like insert path, in the same transaction
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    likes_count INTEGER NOT NULL DEFAULT 0 CHECK(likes_count >= 0),
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts(user_id);
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);

-- Likes table (one row per like event)
CREATE TABLE IF NOT EXISTS likes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    liked_at TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES posts(id),
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_likes_post_id ON likes(post_id);
CREATE INDEX IF NOT EXISTS idx_likes_user_id ON likes(user_id);

-- Comments table (one row per comment event)
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    content TEXT NOT NULL CHECK(length(content) > 0),
    commented_at TEXT NOT NULL,
    FOREIGN KEY (post_id) REFERENCES posts(id),
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
CREATE INDEX IF NOT EXISTS idx_comments_user_id ON comments(user_id);

-- Staging table for flat source rows, in arrival order
CREATE TABLE IF NOT EXISTS activity_staging (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    post_id INTEGER NOT NULL,
    post_content TEXT NOT NULL,
    post_date TEXT NOT NULL,
    likes INTEGER NOT NULL CHECK(likes >= 0),
    comments INTEGER NOT NULL CHECK(comments >= 0)
);

-- Per-post engagement; posts without activity report zero
CREATE VIEW IF NOT EXISTS post_engagement AS
SELECT p.id AS post_id,
       p.user_id AS user_id,
       u.username AS username,
       p.content AS content,
       p.created_at AS created_at,
       COALESCE(l.n, 0) AS total_likes,
       COALESCE(c.n, 0) AS total_comments
FROM posts p
JOIN users u ON u.id = p.user_id
LEFT JOIN (SELECT post_id, COUNT(*) AS n FROM likes GROUP BY post_id) l ON l.post_id = p.id
LEFT JOIN (SELECT post_id, COUNT(*) AS n FROM comments GROUP BY post_id) c ON c.post_id = p.id;

-- Every user with each of their posts; users without posts appear once
CREATE VIEW IF NOT EXISTS user_engagement AS
SELECT u.id AS user_id,
       u.username AS username,
       e.post_id AS post_id,
       e.content AS content,
       e.created_at AS created_at,
       COALESCE(e.total_likes, 0) AS total_likes,
       COALESCE(e.total_comments, 0) AS total_comments
FROM users u
LEFT JOIN post_engagement e ON e.user_id = u.id;
"#;

/// Tables created by `SCHEMA`, in dependency order
pub const TABLES: [&str; 5] = ["users", "posts", "likes", "comments", "activity_staging"];

/// Views created by `SCHEMA`
pub const VIEWS: [&str; 2] = ["post_engagement", "user_engagement"];
