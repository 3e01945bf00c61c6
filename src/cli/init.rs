//! Init command implementation
//!
//! Scaffolds a new Scriptorium project with all necessary configuration files.

use super::output::Output;
use std::fs;
use std::path::Path;

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (scriptorium.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing Scriptorium Project");

    let base_path = &config.path;

    // Check if scriptorium.toml already exists
    let config_path = base_path.join("scriptorium.toml");
    if config_path.exists() && !config.force {
        output.warning("scriptorium.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    // Create the data directory for the feedback database and snapshots
    let data_dir = base_path.join("data");
    if !data_dir.exists() {
        if let Err(e) = fs::create_dir_all(&data_dir) {
            output.error(&format!("Failed to create data: {}", e));
            return InitResult::Error(e.to_string());
        }
        output.created_dir("data");
    } else {
        output.skipped("data", "already exists");
    }

    // Create scriptorium.toml
    let toml_content = generate_scriptorium_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create scriptorium.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "scriptorium.toml");

    // Create .env.example
    let env_example_path = base_path.join(".env.example");
    let env_content = generate_env_example();
    if let Err(e) = write_file(&env_example_path, &env_content, config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("env", ".env.example");

    // Create .gitignore if it doesn't exist
    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        let gitignore_content = generate_gitignore();
        if let Err(e) = write_file(&gitignore_path, &gitignore_content, false) {
            output.warning(&format!("Failed to create .gitignore: {}", e));
        } else {
            output.created("file", ".gitignore");
        }
    }

    // Print completion message and next steps
    output.complete("Scriptorium project initialized successfully!");

    output.header("Next Steps");
    output.newline();
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");
    output.command("# Edit .env and set the Azure OpenAI API keys");
    output.newline();
    output.info("2. Edit scriptorium.toml with your Azure deployment names");
    output.newline();
    output.info("3. Start the server:");
    output.command("scriptorium-server");
    output.newline();

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("Upload PDFs with: curl -F file=@doc.pdf http://localhost:3000/api/documents");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_scriptorium_toml(config: &InitConfig) -> String {
    format!(
        r#"# Scriptorium Configuration
# =========================
# Generated by: scriptorium-server init
#
# REQUIRED: Set these environment variables before starting:
#   - AZURE_CHAT_API_KEY: API key for the chat deployment
#   - AZURE_EMBEDDING_API_KEY: API key for the embedding deployment
#
# Hot Reloading: Changes to this file are automatically detected and applied
# without restarting the server.

# =============================================================================
# Server Configuration
# =============================================================================
[server]
host = "{host}"
port = {port}
log_level = "info"

# =============================================================================
# Azure OpenAI Chat Deployment
# =============================================================================
[chat]
azure_endpoint = "https://your-resource.openai.azure.com"
azure_deployment = "gpt-4o-mini"
api_version = "2024-10-21"
azure_api_key_env = "AZURE_CHAT_API_KEY"

# =============================================================================
# Azure OpenAI Embedding Deployment
# =============================================================================
[embedding]
azure_endpoint = "https://your-resource.openai.azure.com"
azure_deployment = "text-embedding-3-small"
api_version = "2024-10-21"
azure_api_key_env = "AZURE_EMBEDDING_API_KEY"

# =============================================================================
# Database Configuration
# =============================================================================
[database]
feedback_path = "./data/feedback.db"

# =============================================================================
# RAG Configuration
# =============================================================================
[rag]
chunk_size = 1000
chunk_overlap = 200
default_top_k = 5
max_top_k = 10
synthesize_metadata = true
# Persist the index as JSON between restarts (empty = in-memory only)
snapshot_path = "./data/index.json"
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    r#"# Scriptorium Environment Variables
# =================================
# Copy this file to .env and fill in the values.

# REQUIRED: Azure OpenAI API key for the chat deployment
AZURE_CHAT_API_KEY=your-chat-api-key

# REQUIRED: Azure OpenAI API key for the embedding deployment
# (may be the same key when both deployments share a resource)
AZURE_EMBEDDING_API_KEY=your-embedding-api-key

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,scriptorium=debug
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Scriptorium Generated Files
/data/
*.db
*.db-journal

# Environment
.env
.env.local
.env.*.local

# Rust
/target/
Cargo.lock

# IDE
.idea/
.vscode/
*.swp
*.swo
*~

# OS
.DS_Store
Thumbs.db
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }

    #[test]
    fn test_init_result_variants() {
        // Verify enum variants exist and can be matched
        let success = InitResult::Success;
        let exists = InitResult::AlreadyExists;
        let error = InitResult::Error("test error".to_string());

        match success {
            InitResult::Success => (),
            _ => panic!("Expected Success"),
        }

        match exists {
            InitResult::AlreadyExists => (),
            _ => panic!("Expected AlreadyExists"),
        }

        match error {
            InitResult::Error(msg) => assert_eq!(msg, "test error"),
            _ => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_generate_scriptorium_toml() {
        let config = InitConfig {
            path: std::path::PathBuf::from("/tmp"),
            force: false,
            host: "0.0.0.0".to_string(),
            port: 8080,
        };

        let content = generate_scriptorium_toml(&config);

        assert!(content.contains("[server]"));
        assert!(content.contains("host = \"0.0.0.0\""));
        assert!(content.contains("port = 8080"));
        assert!(content.contains("[chat]"));
        assert!(content.contains("[embedding]"));
        assert!(content.contains("AZURE_CHAT_API_KEY"));
        assert!(content.contains("chunk_size = 1000"));
    }

    #[test]
    fn test_generated_toml_parses() {
        let config = create_test_config(&TempDir::new().expect("Failed to create temp dir"));
        let content = generate_scriptorium_toml(&config);

        let parsed: Result<crate::utils::toml_config::ScriptoriumConfig, _> =
            toml::from_str(&content);
        assert!(parsed.is_ok(), "generated config must parse: {:?}", parsed.err());
    }

    #[test]
    fn test_generate_env_example() {
        let content = generate_env_example();

        assert!(content.contains("AZURE_CHAT_API_KEY"));
        assert!(content.contains("AZURE_EMBEDDING_API_KEY"));
        assert!(content.contains("RUST_LOG"));
    }

    #[test]
    fn test_generate_gitignore() {
        let content = generate_gitignore();

        assert!(content.contains("/data/"));
        assert!(content.contains(".env"));
        assert!(content.contains("/target/"));
        assert!(content.contains(".DS_Store"));
    }

    #[test]
    fn test_write_file_creates_new() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        let result = write_file(&file_path, "test content", false);
        assert!(result.is_ok());
        assert!(file_path.exists());

        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "test content");
    }

    #[test]
    fn test_write_file_skips_existing_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        // Create initial file
        fs::write(&file_path, "original").expect("Failed to write");

        // Try to write without force
        let result = write_file(&file_path, "new content", false);
        assert!(result.is_ok());

        // Content should remain original
        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "original");
    }

    #[test]
    fn test_write_file_overwrites_with_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        // Create initial file
        fs::write(&file_path, "original").expect("Failed to write");

        // Write with force
        let result = write_file(&file_path, "new content", true);
        assert!(result.is_ok());

        // Content should be new
        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "new content");
    }

    #[test]
    fn test_run_creates_all_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = create_test_config(&temp_dir);
        let output = Output::no_color();

        let result = run(config, &output);

        match result {
            InitResult::Success => (),
            _ => panic!("Expected Success"),
        }

        // Check all expected files exist
        assert!(temp_dir.path().join("scriptorium.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
        assert!(temp_dir.path().join(".gitignore").exists());
        assert!(temp_dir.path().join("data").is_dir());
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        // Create initial scriptorium.toml
        fs::write(temp_dir.path().join("scriptorium.toml"), "existing").expect("Failed to write");

        let config = create_test_config(&temp_dir);
        let output = Output::no_color();

        let result = run(config, &output);

        match result {
            InitResult::AlreadyExists => (),
            _ => panic!("Expected AlreadyExists"),
        }
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        // Create initial scriptorium.toml
        fs::write(temp_dir.path().join("scriptorium.toml"), "existing").expect("Failed to write");

        let config = InitConfig {
            path: temp_dir.path().to_path_buf(),
            force: true,
            host: "127.0.0.1".to_string(),
            port: 3000,
        };
        let output = Output::no_color();

        let result = run(config, &output);

        match result {
            InitResult::Success => (),
            _ => panic!("Expected Success"),
        }

        // scriptorium.toml should be overwritten
        let content =
            fs::read_to_string(temp_dir.path().join("scriptorium.toml")).expect("Failed to read");
        assert!(content.contains("[server]"));
        assert!(!content.contains("existing"));
    }
}
