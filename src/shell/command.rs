#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    ChgDisk,
    CpDisk,
    Cpu,
    Date,
    Help,
    Mount,
    Quit,
    Exit,
    Reboot,
    Status,
    Time,
    Unmount,
    Uptime,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    pub match_len: usize, // 匹配时比较的前缀长度
    pub doc: &'static str,
    pub detail: Option<&'static str>,
}

impl CommandSpec {
    /// 只比较前 `match_len` 个字符，"statusx" 也能匹配 "status"
    pub fn matches(&self, token: &str) -> bool {
        let len = self.match_len;
        token.as_bytes().get(..len) == self.name.as_bytes().get(..len)
    }
}

const fn spec(
    id: CommandId,
    name: &'static str,
    doc: &'static str,
    detail: Option<&'static str>,
) -> CommandSpec {
    CommandSpec {
        id,
        name,
        match_len: name.len(),
        doc,
        detail,
    }
}

/// 命令表，顺序即匹配顺序：第一个匹配的条目生效
pub static COMMANDS: &[CommandSpec] = &[
    spec(
        CommandId::ChgDisk,
        "chgdisk",
        "change a drives disk image",
        Some(
            "<drive> <disk image>\n\
             \x20    <drive> must be a mounted drive\n\
             \x20    <disk image> must be a valid disk image\n\
             \x20    example: Emu> chgdisk a: image\n",
        ),
    ),
    spec(
        CommandId::CpDisk,
        "cpdisk",
        "copy one mounted disk to another",
        Some(
            "<src> <dst>\n\
             \x20    copies every 128 KiB chunk of <src> onto <dst>\n\
             \x20    only the last digit of each name counts: 0, sd0, disk0, drive0\n",
        ),
    ),
    spec(
        CommandId::Cpu,
        "cpu",
        "read or set CPU frequency",
        Some("[MHz]\n     without an argument shows the current frequency\n"),
    ),
    spec(CommandId::Date, "date", "read or set date", Some("[ddmmyyyy]")),
    spec(
        CommandId::Help,
        "help",
        "Display this text or give help about a command",
        Some(
            "<cmd>\n\
             \x20    displays more information about <cmd>\n\
             \x20    valid commands are:\n\
             \x20         chgdisk, cpdisk, cpu, date, help, mount, quit, reboot, status, time, unmount, uptime\n",
        ),
    ),
    spec(
        CommandId::Mount,
        "mount",
        "mount a disk image on a drive",
        Some("<drive> <disk image> [partition]\n     example: Emu> mount a image.img\n"),
    ),
    spec(CommandId::Quit, "quit", "Exit shell", None),
    spec(CommandId::Exit, "exit", "Exit shell", None),
    spec(CommandId::Reboot, "reboot", "Reset the emulator", None),
    spec(CommandId::Status, "status", "Display Emulator info", Some("list stuff")),
    spec(CommandId::Time, "time", "read or set time", Some("[hhmmss]")),
    spec(
        CommandId::Unmount,
        "unmount",
        "unmount a drive",
        Some("<drive>\n     example: Emu> unmount b\n"),
    ),
    spec(
        CommandId::Uptime,
        "uptime",
        "Display elapsed time",
        Some("displays elapsed time since power on"),
    ),
];

pub fn lookup(token: &str) -> Option<&'static CommandSpec> {
    lookup_in(COMMANDS, token)
}

fn lookup_in<'a>(table: &'a [CommandSpec], token: &str) -> Option<&'a CommandSpec> {
    table.iter().find(|cmd| cmd.matches(token))
}

/// `help <cmd>`：第一个名字包含 `fragment` 的条目
pub fn find_help(fragment: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|cmd| cmd.name.contains(fragment))
}
