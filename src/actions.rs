//! Action vocabulary and the executor seam.
//!
//! Action names form a closed vocabulary. Each [`ActionKind`] carries its
//! capability flags in one table: whether it runs continuously while its
//! gesture is held and whether its executor needs the current hand pose.
//! Free-form `type:<text>` and `cmd:<command>` actions are also accepted.
//!
//! How an action is realized (key presses, pointer events, process launches)
//! is up to the [`ActionExecutor`] supplied by the embedding application.
//! [`ActionRegistry`] is a ready-made executor built from a table of
//! handlers registered at startup.

use crate::{landmarks::HandPose, Error, Result};
use std::{collections::HashMap, fmt, str::FromStr};

macro_rules! action_kinds {
    ($( $(#[$doc:meta])* $variant:ident => $name:literal, continuous: $cont:literal, pose: $pose:literal; )+) => {
        /// Built-in action kinds
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ActionKind {
            $( $(#[$doc])* $variant, )+
        }

        impl ActionKind {
            /// Every built-in action, in presentation order
            pub const ALL: &'static [ActionKind] = &[ $( ActionKind::$variant, )+ ];

            /// Wire name of the action
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( ActionKind::$variant => $name, )+
                }
            }

            /// Runs every frame while its gesture stays confirmed
            #[must_use]
            pub const fn is_continuous(&self) -> bool {
                match self {
                    $( ActionKind::$variant => $cont, )+
                }
            }

            /// Executor needs the current hand pose
            #[must_use]
            pub const fn needs_pose(&self) -> bool {
                match self {
                    $( ActionKind::$variant => $pose, )+
                }
            }

            /// Look up a built-in by wire name
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(ActionKind::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

action_kinds! {
    // Media
    MediaPlayPause => "media_play_pause", continuous: false, pose: false;
    MediaStop => "media_stop", continuous: false, pose: false;
    MediaNext => "media_next", continuous: false, pose: false;
    MediaPrev => "media_prev", continuous: false, pose: false;
    VolumeMute => "volume_mute", continuous: false, pose: false;
    VolumeUp => "volume_up", continuous: true, pose: false;
    VolumeDown => "volume_down", continuous: true, pose: false;

    // Browser
    BrowserNewTab => "browser_new_tab", continuous: false, pose: false;
    BrowserCloseTab => "browser_close_tab", continuous: false, pose: false;
    BrowserReopenTab => "browser_reopen_tab", continuous: false, pose: false;
    BrowserNextTab => "browser_next_tab", continuous: false, pose: false;
    BrowserPrevTab => "browser_prev_tab", continuous: false, pose: false;
    BrowserFocusAddress => "browser_focus_address", continuous: false, pose: false;
    BrowserRefresh => "browser_refresh", continuous: false, pose: false;
    BrowserHistory => "browser_history", continuous: false, pose: false;
    BrowserDownloads => "browser_downloads", continuous: false, pose: false;

    // Productivity
    ClipboardCopy => "copy", continuous: false, pose: false;
    ClipboardPaste => "paste", continuous: false, pose: false;
    ClipboardCut => "cut", continuous: false, pose: false;
    Undo => "undo", continuous: false, pose: false;
    Redo => "redo", continuous: false, pose: false;
    SelectAll => "select_all", continuous: false, pose: false;
    Save => "save", continuous: false, pose: false;
    Print => "print", continuous: false, pose: false;
    ZoomIn => "zoom_in", continuous: false, pose: false;
    ZoomOut => "zoom_out", continuous: false, pose: false;

    // Presentation
    PptNext => "ppt_next", continuous: false, pose: false;
    PptPrev => "ppt_prev", continuous: false, pose: false;
    PptStart => "ppt_start", continuous: false, pose: false;
    PptStop => "ppt_stop", continuous: false, pose: false;
    PptBlackScreen => "ppt_black_screen", continuous: false, pose: false;
    PptWhiteScreen => "ppt_white_screen", continuous: false, pose: false;
    PptLaserPointer => "ppt_laser_pointer", continuous: false, pose: false;
    PptPen => "ppt_pen", continuous: false, pose: false;

    // Document
    WordBold => "word_bold", continuous: false, pose: false;
    WordItalic => "word_italic", continuous: false, pose: false;
    WordUnderline => "word_underline", continuous: false, pose: false;
    WordAlignCenter => "word_align_center", continuous: false, pose: false;
    WordAlignLeft => "word_align_left", continuous: false, pose: false;
    WordAlignRight => "word_align_right", continuous: false, pose: false;

    // Navigation
    /// Scroll speed follows index fingertip height
    DynamicScroll => "dynamic_scroll", continuous: true, pose: true;
    ScrollUp => "scroll_up", continuous: true, pose: false;
    ScrollDown => "scroll_down", continuous: true, pose: false;
    PageUp => "page_up", continuous: false, pose: false;
    PageDown => "page_down", continuous: false, pose: false;
    ArrowUp => "arrow_up", continuous: false, pose: false;
    ArrowDown => "arrow_down", continuous: false, pose: false;
    ArrowLeft => "arrow_left", continuous: false, pose: false;
    ArrowRight => "arrow_right", continuous: false, pose: false;

    // Window management
    SnapWindowLeft => "snap_window_left", continuous: false, pose: false;
    SnapWindowRight => "snap_window_right", continuous: false, pose: false;
    MinimizeWindow => "minimize_window", continuous: false, pose: false;
    MaximizeWindow => "maximize_window", continuous: false, pose: false;
    RestoreWindow => "restore_window", continuous: false, pose: false;
    CloseCurrentWindow => "close_current_window", continuous: false, pose: false;
    AltTab => "alt_tab", continuous: false, pose: false;
    WinTab => "win_tab", continuous: false, pose: false;
    ShowDesktop => "show_desktop", continuous: false, pose: false;
    DesktopNext => "desktop_next", continuous: false, pose: false;
    DesktopPrev => "desktop_prev", continuous: false, pose: false;
    DesktopNew => "desktop_new", continuous: false, pose: false;
    DesktopClose => "desktop_close", continuous: false, pose: false;

    // Mouse
    /// Cursor follows the index fingertip
    TrackCursor => "track_cursor", continuous: true, pose: true;
    /// Cursor plus curl-driven clicks
    SmartMouse => "smart_mouse", continuous: true, pose: true;
    LeftClick => "left_click", continuous: false, pose: false;
    RightClick => "right_click", continuous: false, pose: false;
    DoubleClick => "double_click", continuous: false, pose: false;
    MiddleClick => "middle_click", continuous: false, pose: false;

    // System
    OpenStartMenu => "open_start_menu", continuous: false, pose: false;
    EmojiPanel => "emoji_panel", continuous: false, pose: false;
    ClipboardHistory => "clipboard_history", continuous: false, pose: false;
    RunDialog => "run_dialog", continuous: false, pose: false;
    Screenshot => "screenshot", continuous: false, pose: false;
    LockScreen => "lock_screen", continuous: false, pose: false;
    TaskManager => "task_manager", continuous: false, pose: false;
    FileExplorer => "file_explorer", continuous: false, pose: false;
    Settings => "settings", continuous: false, pose: false;
    Enter => "enter", continuous: false, pose: false;
    Space => "space", continuous: false, pose: false;
    Esc => "esc", continuous: false, pose: false;
    Backspace => "backspace", continuous: false, pose: false;
    Tab => "tab", continuous: false, pose: false;

    // Power and apps
    Shutdown => "shutdown", continuous: false, pose: false;
    Restart => "restart", continuous: false, pose: false;
    Sleep => "sleep", continuous: false, pose: false;
    OpenCalculator => "open_calculator", continuous: false, pose: false;
    OpenNotepad => "open_notepad", continuous: false, pose: false;
    OpenCmd => "open_cmd", continuous: false, pose: false;
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix of text-typing actions
pub const TYPE_PREFIX: &str = "type:";

/// Prefix of shell-command actions
pub const CMD_PREFIX: &str = "cmd:";

/// A parsed action name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// One of the built-in kinds
    Builtin(ActionKind),
    /// `type:<text>`
    TypeText(String),
    /// `cmd:<command>`
    Command(String),
    /// Not in the vocabulary; never has a handler
    Unknown(String),
}

impl Action {
    /// Parse a bound action name. Never fails: unrecognized names become
    /// [`Action::Unknown`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if let Some(text) = name.strip_prefix(TYPE_PREFIX) {
            return Self::TypeText(text.to_string());
        }
        if let Some(cmd) = name.strip_prefix(CMD_PREFIX) {
            return Self::Command(cmd.to_string());
        }
        // Older bindings used the short name
        if name == "play_pause" {
            return Self::Builtin(ActionKind::MediaPlayPause);
        }
        ActionKind::from_name(name).map_or_else(|| Self::Unknown(name.to_string()), Self::Builtin)
    }

    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Builtin(kind) if kind.is_continuous())
    }

    #[must_use]
    pub fn needs_pose(&self) -> bool {
        matches!(self, Self::Builtin(kind) if kind.needs_pose())
    }

    #[must_use]
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::Builtin(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidInput("empty action name".to_string()));
        }
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(kind) => f.write_str(kind.as_str()),
            Self::TypeText(text) => write!(f, "{TYPE_PREFIX}{text}"),
            Self::Command(cmd) => write!(f, "{CMD_PREFIX}{cmd}"),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}

/// Names of all selectable actions, including the free-form families
#[must_use]
pub fn available_actions() -> Vec<&'static str> {
    ActionKind::ALL
        .iter()
        .map(ActionKind::as_str)
        .chain(["custom_command", "type_text"])
        .collect()
}

/// Result of asking an executor to run an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    /// Action ran; carries a short description for status display
    Executed(String),
    /// No handler is registered for this action
    NoHandler,
}

/// Realizes actions as side effects. Implemented by the embedding application.
pub trait ActionExecutor: Send {
    /// Run `action`. `pose` is supplied for actions that need it.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying side effect.
    fn execute(&mut self, action: &Action, pose: Option<&HandPose>) -> Result<ExecStatus>;
}

/// Handler for a built-in action
pub type ActionHandler = Box<dyn FnMut(Option<&HandPose>) -> Result<()> + Send>;

/// Handler for `type:` and `cmd:` payloads
pub type PayloadHandler = Box<dyn FnMut(&str) -> Result<()> + Send>;

/// Lookup table from action kind to handler, filled once at startup
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<ActionKind, ActionHandler>,
    type_text: Option<PayloadHandler>,
    command: Option<PayloadHandler>,
}

impl ActionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for `kind`
    pub fn register<F>(&mut self, kind: ActionKind, handler: F) -> &mut Self
    where
        F: FnMut(Option<&HandPose>) -> Result<()> + Send + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    pub fn on_type_text<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&str) -> Result<()> + Send + 'static,
    {
        self.type_text = Some(Box::new(handler));
        self
    }

    pub fn on_command<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(&str) -> Result<()> + Send + 'static,
    {
        self.command = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn has_handler(&self, action: &Action) -> bool {
        match action {
            Action::Builtin(kind) => self.handlers.contains_key(kind),
            Action::TypeText(_) => self.type_text.is_some(),
            Action::Command(_) => self.command.is_some(),
            Action::Unknown(_) => false,
        }
    }
}

impl ActionExecutor for ActionRegistry {
    fn execute(&mut self, action: &Action, pose: Option<&HandPose>) -> Result<ExecStatus> {
        match action {
            Action::Builtin(kind) => match self.handlers.get_mut(kind) {
                Some(handler) => {
                    handler(pose.filter(|_| kind.needs_pose()))?;
                    Ok(ExecStatus::Executed(kind.as_str().to_string()))
                }
                None => Ok(ExecStatus::NoHandler),
            },
            Action::TypeText(text) => match self.type_text.as_mut() {
                Some(handler) => {
                    handler(text)?;
                    Ok(ExecStatus::Executed(format!("Typed: {text}")))
                }
                None => Ok(ExecStatus::NoHandler),
            },
            Action::Command(cmd) => match self.command.as_mut() {
                Some(handler) => {
                    handler(cmd)?;
                    Ok(ExecStatus::Executed(format!("CMD: {cmd}")))
                }
                None => Ok(ExecStatus::NoHandler),
            },
            Action::Unknown(_) => Ok(ExecStatus::NoHandler),
        }
    }
}
