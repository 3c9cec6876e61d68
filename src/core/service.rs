use super::errors::AppError;
use crate::core::entities::{BoardState, LevelResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};

/// Request/response boundary to whatever generates and levels boards.
pub trait BoardService {
    fn generate(&mut self, seed: u32) -> Result<BoardState, AppError>;

    fn level(&mut self, board: &BoardState) -> Result<LevelResult, AppError>;
}

#[derive(Serialize)]
struct LevelRequest<'a> {
    board: &'a BoardState,
}

/// Runs an external program once per request, JSON on stdin and stdout.
pub struct ProcessBoardService {
    bin_path: String,
    args: Vec<String>,
}

struct ProcessOutput {
    cmd_name: String,
    stdout: Vec<u8>,
}

impl ProcessOutput {
    fn decode<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.stdout).map_err(|e| {
            let err_msg = format!("cmd '{}' returned invalid data: {}", &self.cmd_name, e);

            warn!("{}", &err_msg);

            AppError { message: err_msg }
        })
    }
}

impl ProcessBoardService {
    pub fn new(bin_path: &str, additional_args: &[String]) -> Self {
        ProcessBoardService {
            bin_path: bin_path.to_string(),
            args: additional_args.to_vec(),
        }
    }

    fn run(&self, request: &[&str], stdin: Option<Vec<u8>>) -> Result<ProcessOutput, AppError> {
        let mut args: Vec<&str> = self.args.iter().map(|s| s as &str).collect();
        args.extend_from_slice(request);

        let cmd_name = format!("{} {}", &self.bin_path, args.join(" "));

        debug!("running command: {}", &cmd_name);

        let mut child = Command::new(&self.bin_path)
            .args(&args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                let err_msg = format!("Error starting '{}': {}", &self.bin_path, e);

                warn!("{}", &err_msg);

                AppError { message: err_msg }
            })?;

        if let (Some(payload), Some(mut child_stdin)) = (stdin, child.stdin.take()) {
            child_stdin.write_all(&payload).map_err(|e| AppError {
                message: format!("Error writing request to '{}': {}", &cmd_name, e),
            })?;
        }

        let output = child.wait_with_output().map_err(|e| AppError {
            message: format!("Error waiting for '{}': {}", &cmd_name, e),
        })?;

        if !output.status.success() {
            let err_msg = format!(
                "cmd '{}' failed with {}: {}",
                &cmd_name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );

            warn!("{}", &err_msg);

            return Err(AppError { message: err_msg });
        }

        debug!("received {} bytes from '{}'", output.stdout.len(), &cmd_name);

        Ok(ProcessOutput {
            cmd_name,
            stdout: output.stdout,
        })
    }
}

impl BoardService for ProcessBoardService {
    fn generate(&mut self, seed: u32) -> Result<BoardState, AppError> {
        let seed = seed.to_string();

        self.run(&["generate", &seed], None)?.decode()
    }

    fn level(&mut self, board: &BoardState) -> Result<LevelResult, AppError> {
        let payload = serde_json::to_vec(&LevelRequest { board }).map_err(|e| AppError {
            message: format!("Can't encode level request: {}", e),
        })?;

        self.run(&["level"], Some(payload))?.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_service_error() {
        let mut service = ProcessBoardService::new("/nonexistent/seiti-cli", &[]);

        let err = service.generate(1).unwrap_err();

        assert!(err.message.contains("/nonexistent/seiti-cli"));
    }

    #[cfg(unix)]
    #[test]
    fn generate_decodes_program_output() {
        let script = r#"echo '{"size":1,"seed":'"$2"',"stones":[1],"territory":[0]}'"#;
        let mut service =
            ProcessBoardService::new("sh", &["-c".to_string(), script.to_string(), "sh".to_string()]);

        let board = service.generate(5).unwrap();

        assert_eq!(board.seed, 5);
        assert!(board.is_well_formed());
    }

    #[cfg(unix)]
    #[test]
    fn level_sends_board_on_stdin() {
        let script = r#"cat > /dev/null; echo '{"board":{"size":1,"seed":3,"stones":[0],"territory":[1]},"moves":[]}'"#;
        let mut service = ProcessBoardService::new("sh", &["-c".to_string(), script.to_string()]);

        let result = service.level(&BoardState::empty(1, 3)).unwrap();

        assert_eq!(result.board.seed, 3);
        assert!(result.moves.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_a_service_error() {
        let mut service = ProcessBoardService::new("sh", &["-c".to_string(), "exit 3".to_string()]);

        assert!(service.generate(1).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn garbage_output_is_a_service_error() {
        let mut service =
            ProcessBoardService::new("sh", &["-c".to_string(), "echo nope".to_string()]);

        let err = service.generate(1).unwrap_err();

        assert!(err.message.contains("invalid data"));
    }
}
